pub mod call;
pub mod list_tools;
