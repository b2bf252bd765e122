mod backup_handler;

pub use backup_handler::{export_backup, import_backup, __path_export_backup, __path_import_backup};
