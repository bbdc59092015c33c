//! # Presentation Layer
//!
//! ```text
//! [ Handler ] --> [ Presenter ] --> [ ViewModel ] --> [ Renderer ] --> [ Output ]
//!    (Controller)      (Converter)       (Contract)       (View)        (Console/JSON)
//! ```
//!
//! * `view_models`: plain serializable data. `--format json` prints them as is.
//! * `presenters`: convert package and core results into view models.
//! * `views`: `fmt::Display` layouts for plain output.
//! * `renderer`: picks JSON or text and adds badges and tips.
//! * `html`: the static preview page written by `dump`.

pub mod html;
pub mod presenters;
pub mod renderer;
pub mod view_models;
pub mod views;

pub use renderer::ConsoleRenderer;
pub use view_models::{CommandResultViewModel, Guidance, StatusBadge};
