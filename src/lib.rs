//! # parm-transfer: Node Parameter Transfer
//!
//! Compare the parameters of a source node with one or more target nodes and
//! selectively copy values, expressions and keyframe animation across.
//!
//! ## Architecture
//!
//! - **Scene**: the host application behind the [`SceneApi`] trait, with an
//!   in-memory implementation for the desktop binary and tests
//! - **Snapshot**: immutable [`ParameterDescriptor`]s of the source node
//! - **Transfer**: the per-pair [`TransferResolver`] and the batch runner
//! - **Session**: headless panel state (table, filters, targets, options)
//! - **Frontend**: the eframe/egui window over a session
//!
//! ## Configuration
//!
//! Defaults for the transfer options, the UI and the log filter are read from
//! `config.toml` in the platform config directory under `dev.parm-transfer`.
//!
//! ## Example
//!
//! ```ignore
//! use parm_transfer::scene::demo::demo_scene;
//! use parm_transfer::{SceneApi, TransferSession};
//!
//! let mut scene = demo_scene();
//! let mut session = TransferSession::default();
//! session.set_source_path(&scene, "/obj/geo1/transform1")?;
//! session.table_mut().check_non_default();
//!
//! let target = scene.find_node("/obj/geo1/transform2").unwrap();
//! session.targets_mut().add([target]);
//!
//! let pending = session.prepare_transfer(&scene)?;
//! let summary = session.execute(&mut scene, &pending)?;
//! println!("{}", summary.completion_message());
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod frontend;
pub mod scene;
pub mod session;
pub mod snapshot;
pub mod transfer;
pub mod types;

// Re-export commonly used types
pub use app::ParmTransferApp;
pub use config::AppConfig;
pub use error::{BatchPrecondition, ParmTransferError, Result};
pub use scene::{MemoryScene, SceneApi};
pub use session::TransferSession;
pub use snapshot::{load_parameters, ParameterDescriptor};
pub use transfer::{
    run_batch, transfer, BatchSummary, TransferOptions, TransferOutcome, TransferResolver,
};
pub use types::{NodeId, ParmValue, TypeClass};
