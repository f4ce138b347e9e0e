// TabBridge services
// Services talk to the outside world: the CloudTabs file, its watcher and the settings file.

pub mod cloud_tabs_reader;
pub mod database_monitor;
pub mod position_decoder;
pub mod settings_engine;
