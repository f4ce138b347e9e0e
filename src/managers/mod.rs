// TabBridge state managers
// Managers hold state owned by the App: the current snapshot and how it is presented.

pub mod view_state;
