mod aliases;
pub use aliases::AliasTable;
mod commands;
pub use commands::{Command, FlowEntry};
mod config;
pub use config::Config;
mod dates;
mod incomplete;
mod phone;
mod replies;
mod router;
pub use router::Router;
mod session;
pub use session::{
    AddEventStep, EditEventSession, EditEventStep, Mode, NotifyStep, SearchStep, Session,
    SessionStore,
};
