mod backup_dto;

pub use backup_dto::{
    BackupCategory, BackupDocument, BackupSubTask, BackupTask, BackupUser, ImportSummaryDto,
};
