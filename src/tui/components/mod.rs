//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as parameters:
//! - `TitleBar`: header showing the active conversation and status
//! - `MessageView`: individual chat message rendering
//! - `TypingIndicator`: animated dots while a reply is outstanding
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: the composer
//! - `MessageList`: scrollable conversation view with layout caching
//! - `Sidebar`: conversation list with selection and delete confirmation
//!
//! Each component file contains everything related to that component: state
//! types, event types, rendering logic, event handling, and tests.
//! Components receive external data as "props", not by reaching into global
//! state, which keeps dependencies explicit and components testable.

pub mod input_box;
pub mod message;
pub mod message_list;
pub mod sidebar;
pub mod title_bar;
pub mod typing_indicator;

pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use sidebar::{Sidebar, SidebarEvent, SidebarState};
pub use title_bar::TitleBar;
