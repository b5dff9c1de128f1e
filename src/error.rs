use std::fmt;

/// Lỗi mức ứng dụng
#[derive(Debug)]
pub enum AppError {
    /// Lỗi thao tác file
    File(FileError),
    /// Lỗi cấu hình
    Config(ConfigError),
    /// Lỗi ghép đề
    Assembly(AssemblyError),
    /// Lỗi khác (bọc lỗi thư viện bên thứ ba)
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::File(e) => write!(f, "Lỗi file: {}", e),
            AppError::Config(e) => write!(f, "Lỗi cấu hình: {}", e),
            AppError::Assembly(e) => write!(f, "Lỗi ghép đề: {}", e),
            AppError::Other(msg) => write!(f, "Lỗi: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::File(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Assembly(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// Lỗi thao tác file
#[derive(Debug)]
pub enum FileError {
    /// Thư mục không tồn tại
    DirectoryNotFound { path: String },
    /// Đọc file thất bại
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Ghi file thất bại
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Giải mã TOML thất bại
    TomlParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::DirectoryNotFound { path } => {
                write!(f, "Thư mục không tồn tại: {}", path)
            }
            FileError::ReadFailed { path, source } => {
                write!(f, "Đọc file thất bại ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "Ghi file thất bại ({}): {}", path, source)
            }
            FileError::TomlParseFailed { path, source } => {
                write!(f, "Giải mã TOML thất bại ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. }
            | FileError::WriteFailed { source, .. }
            | FileError::TomlParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// Lỗi cấu hình
#[derive(Debug)]
pub enum ConfigError {
    /// Biến môi trường không giải mã được
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// Chuỗi ma trận đề không hợp lệ
    MatrixSpecInvalid { spec: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "Biến môi trường {} không hợp lệ: giá trị '{}' không đổi được sang {}",
                    var_name, value, expected_type
                )
            }
            ConfigError::MatrixSpecInvalid { spec } => {
                write!(f, "Chuỗi ma trận đề không hợp lệ: '{}'", spec)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Lỗi ghép đề ở mức ứng dụng
#[derive(Debug)]
pub enum AssemblyError {
    /// Không có câu hỏi nào sau khi nạp toàn bộ nguồn
    EmptyPool,
    /// Số bản đề yêu cầu bằng 0
    NoVariantsRequested,
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyError::EmptyPool => {
                write!(f, "Ngân hàng câu hỏi rỗng, không có gì để ghép đề")
            }
            AssemblyError::NoVariantsRequested => {
                write!(f, "Số bản đề yêu cầu phải lớn hơn 0")
            }
        }
    }
}

impl std::error::Error for AssemblyError {}

// ========== Chuyển đổi từ các lỗi thường gặp ==========

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Other(format!("Lỗi JSON: {}", err))
    }
}

// ========== Hàm dựng tiện lợi ==========

impl AppError {
    /// Tạo lỗi ghi file
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// Tạo lỗi thư mục không tồn tại
    pub fn directory_not_found(path: impl Into<String>) -> Self {
        AppError::File(FileError::DirectoryNotFound { path: path.into() })
    }

    /// Tạo lỗi ngân hàng rỗng
    pub fn empty_pool() -> Self {
        AppError::Assembly(AssemblyError::EmptyPool)
    }

    /// Tạo lỗi chuỗi ma trận không hợp lệ
    pub fn matrix_spec_invalid(spec: impl Into<String>) -> Self {
        AppError::Config(ConfigError::MatrixSpecInvalid { spec: spec.into() })
    }
}

// ========== Bí danh Result ==========

/// Kiểu kết quả mức ứng dụng
pub type AppResult<T> = Result<T, AppError>;
