// Interface adapters: wire protocol, HTTP gateway, and the push-event stream.

pub mod clients;
pub mod clock;
pub mod events;
pub mod protocol;
pub mod sse;

pub use clients::movement::MovementApiClient;
pub use clock::SystemClock;
pub use events::{MovementEventListener, Subscription};
