// calwidget
// Controller and binding surface for an embeddable calendar widget

pub mod binding;
pub mod config;
pub mod controller;
pub mod error;
pub mod hooks;
pub mod locale;
pub mod messages;
pub mod models;
pub mod signal;
pub mod templates;
pub mod title;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use binding::{BindingSurface, CalendarBindings};
pub use config::{validate_config, DayViewOptions, WidgetConfig};
pub use controller::{refresh_needed, ControllerState, ViewStateController};
pub use error::{WidgetError, WidgetResult};
pub use hooks::CalendarHooks;
pub use messages::BindingMessage;
pub use models::*;
pub use signal::{RefreshNotifier, RefreshSignal, SubscriptionId};
pub use templates::{BuiltinTemplates, TemplatePart, TemplateProvider, TemplateSet};
pub use title::{TitleFormats, TitleFormatter};
pub use validation::{inspect_event, validate_event, EventIssue};
