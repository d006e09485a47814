//! Domain layer: value objects, protocol envelopes, the persona table and
//! the traits every outer layer plugs into.

pub mod collaborator;
pub mod envelope;
pub mod error;
pub mod persona;
pub mod registry;
pub mod session;
pub mod value_object;

pub use collaborator::{AiResponder, Completion, TranscriptRecord, TranscriptRecorder};
pub use envelope::{InboundEnvelope, OutboundEnvelope};
pub use error::{CollaboratorError, MessagePushError, RegistryError, ValueObjectError};
pub use persona::Persona;
pub use registry::{ConnectionRegistry, OUTBOUND_QUEUE_CAPACITY, PusherChannel};
pub use session::{SessionContext, SessionScope};
pub use value_object::{ConnectionId, SessionId, Username};

#[cfg(test)]
pub use collaborator::{MockAiResponder, MockTranscriptRecorder};
