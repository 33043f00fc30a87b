//! # questionnaire-wizard-dialoguer
//!
//! Dialoguer front-end for questionnaire sessions.
//!
//! The driver presents a `Session` page by page in a classic CLI wizard
//! style. All rules (validation, the allocation gate, when Submit is
//! offered) live in the session; this crate only prompts and prints.
//!
//! ## Example
//!
//! ```rust,ignore
//! use questionnaire::{MemorySink, Session, SessionConfig};
//! use questionnaire_wizard_dialoguer::DialoguerDriver;
//!
//! fn main() -> anyhow::Result<()> {
//!     let questionnaire = example_questionnaires::pilot();
//!     let sink = MemorySink::new();
//!     let mut session = Session::start(&questionnaire, SessionConfig::default())?;
//!     let record = DialoguerDriver::new().run(&mut session, &sink)?;
//!     println!("Saved response for {}", record.identity());
//!     Ok(())
//! }
//! ```

mod config;
mod driver;

pub use config::AppConfig;
pub use driver::{DialoguerDriver, DialoguerError, Navigation, navigation_choices, page_heading};
