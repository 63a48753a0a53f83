use crate::report::{FailureDetail, SourceExcerpt, Verdict};
use crate::sentinel::{self, SentinelPayload};
use rtt_api::host::{SourceFile, TypeChecker};
use rtt_api::model::NodeShape;
use tracing::trace;

/// Shown when the type received by an assertion could not be found.
pub const UNDISPLAYABLE_RECEIVED: &str =
    "Error displaying received type, please check it in the code manually.";

/// Classifies assertion calls of a file using a type checker.
pub struct VerdictResolver<'a, F: SourceFile, C: TypeChecker<F::Node>> {
    file: &'a F,
    checker: &'a C,
}

impl<'a, F: SourceFile, C: TypeChecker<F::Node>> VerdictResolver<'a, F, C> {
    pub fn new(file: &'a F, checker: &'a C) -> Self {
        Self { file, checker }
    }

    /// Decodes the failure payload of the return type of `call`.
    ///
    /// Calls without a resolved signature are never failing.
    pub fn failure_payload(&self, call: F::Node) -> Option<SentinelPayload> {
        let signature = match self.checker.resolved_signature(call) {
            Some(signature) => signature,
            None => {
                trace!("no signature for call {:?}", call);
                return None;
            }
        };
        let return_type = self
            .checker
            .type_to_string(&self.checker.return_type_of_signature(&signature));
        trace!("call {:?} returns {}", call, return_type);
        sentinel::decode(&return_type)
    }

    /// Decides if the assertion `call` passes.
    pub fn resolve(&self, call: F::Node) -> Verdict {
        let payload = match self.failure_payload(call) {
            Some(payload) => payload,
            None => return Verdict::Pass,
        };
        let location = self.file.location(call);
        Verdict::Fail {
            detail: FailureDetail {
                received: self
                    .received(call)
                    .unwrap_or_else(|| UNDISPLAYABLE_RECEIVED.to_owned()),
                expected: self
                    .checker
                    .type_from_type_argument(call, 0)
                    .map(|ty| self.checker.type_to_string(&ty)),
                simplified_expected: payload.simplified_expected,
                message: payload.message.split('\n').map(str::to_owned).collect(),
                location,
                excerpt: SourceExcerpt::capture(self.file.text(), location.line),
            },
        }
    }

    /// The first type argument of the receiver type, for calls like `assertType<T>().equals<U>()`.
    fn received(&self, call: F::Node) -> Option<String> {
        let callee = match self.file.shape(call) {
            NodeShape::Call { callee, .. } => callee,
            _ => return None,
        };
        let receiver = match self.file.shape(callee) {
            NodeShape::PropertyAccess { object, .. } => object,
            _ => return None,
        };
        let receiver_type = self.checker.type_at_location(receiver)?;
        let received = self.checker.resolved_type_argument(&receiver_type, 0)?;
        Some(self.checker.type_to_string(&received))
    }
}
