//! Open Trivia DB integration: response decoding, question model, and the
//! prefetching cache service with its scheduler/transport seams.

pub mod decoder;
pub mod question;
pub mod scheduler;
pub mod service;
pub mod transport;

pub use decoder::{parse, parse_status, ParseResult};
pub use question::RawQuestion;
pub use scheduler::{Scheduler, TokioScheduler, TICK};
pub use service::{CacheKind, TriviaService};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
