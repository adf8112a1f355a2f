//! Upload Adapter - 上传文件临时存储

mod temp_upload;

pub use temp_upload::{file_suffix, TempUpload, UploadDir, UploadError, UPLOAD_PREFIX};
