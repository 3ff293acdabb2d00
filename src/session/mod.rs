pub mod client;
pub mod effects;
pub mod role;
pub mod runner;

pub use client::SessionClient;
pub use effects::{
    BoardSurface, ConnectionState, Interaction, LinkAffordances, Notice, NoticeKind, Notifier,
    SessionView, Transport,
};
pub use role::{derive_role, share_link, PageContext, RoleContext};
pub use runner::{run_session, SessionEvent, SessionOutcome, UiCommand};
