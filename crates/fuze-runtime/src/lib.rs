//! Fuze runtime: the [`EventLoop`] orchestration hub and its
//! background machinery.
//!
//! ```text
//!                         ┌─────────────────────────────┐
//!  register ────────────► │          EventLoop          │
//!  trigger ─────────────► │                             │
//!  subscribe ───────────► │  Mutex<TriggerRegistry>     │
//!  toggle / remove ─────► │  shutdown: CancelToken      │
//!                         └──────────┬──────────────────┘
//!                                    │ spawns
//!              ┌─────────────────────┼─────────────────────┐
//!              ▼                     ▼                     ▼
//!       interval drivers     delayed one-shots       barrier loops
//!       (scheduler)          (scheduler)             (subscribe)
//! ```
//!
//! Everything the loop spawns selects on the loop-wide shutdown
//! token, so its lifetime bounds every task it ever started. See the
//! module docs of [`eventloop`], [`scheduler`] and [`subscribe`] for
//! the protocols.
//!
//! # Example
//!
//! ```no_run
//! use fuze_event::{CancelToken, EventBuilder};
//! use fuze_runtime::EventLoop;
//! use fuze_types::TriggerName;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let event_loop = EventLoop::new();
//! let ctx = CancelToken::new();
//!
//! event_loop.register(
//!     &ctx,
//!     [EventBuilder::new()
//!         .with_trigger("ping")
//!         .action(|_| "pong".to_string())
//!         .build()],
//! )?;
//!
//! let name = TriggerName::try_from("ping")?;
//! let outputs = event_loop.trigger(&ctx, &name)?.join().await;
//! assert_eq!(outputs, vec!["pong".to_string()]);
//! # Ok(())
//! # }
//! ```

mod error;
mod eventloop;
mod handle;
mod scheduler;
mod subscribe;

pub use error::LoopError;
pub use eventloop::{EventLoop, LoopFunc};
pub use handle::TriggerHandle;
