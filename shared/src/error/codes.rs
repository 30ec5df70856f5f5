//! Error codes for RestoranMaestro
//!
//! Codes are shared by the cloud service and the dashboard frontend.
//! They are grouped by range:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Tenant (restaurant) errors
//! - 6xxx: Menu errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a bare `u16` so the frontend can switch on it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// No session on the request
    NotAuthenticated = 1001,
    /// Wrong slug or password
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is malformed or has a bad signature
    TokenInvalid = 1004,
    /// Session was revoked or expired server-side
    SessionExpired = 1005,
    /// Restaurant account is cancelled or suspended
    AccountDisabled = 1007,
    /// Too many login attempts
    TooManyRequests = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Superadmin session required
    AdminRequired = 2003,
    /// Session belongs to a different restaurant
    TenantMismatch = 2006,

    // ==================== 3xxx: Tenant ====================
    /// Restaurant not found
    RestaurantNotFound = 3002,
    /// Slug already in use
    SlugTaken = 3101,
    /// Slug is reserved for the superadmin
    ReservedSlug = 3102,
    /// Slug has an invalid format
    InvalidSlug = 3103,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Price is negative or not a finite number
    InvalidPrice = 6002,
    /// Category not found
    CategoryNotFound = 6101,
    /// Discount percentage out of range
    InvalidDiscount = 6201,
    /// Malformed schedule (time or weekday)
    InvalidSchedule = 6202,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Invalid/corrupted image file
    InvalidImageFile = 6503,
    /// Empty file provided
    EmptyFile = 6505,
    /// File storage failed
    FileStorageFailed = 6509,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// User-facing (Spanish) message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operación completada",
            ErrorCode::ValidationFailed => "Datos inválidos",
            ErrorCode::NotFound => "Recurso no encontrado",
            ErrorCode::AlreadyExists => "El recurso ya existe",
            ErrorCode::InvalidFormat => "Formato inválido",
            ErrorCode::RequiredField => "Falta un campo obligatorio",

            // Auth
            ErrorCode::NotAuthenticated => "No autenticado",
            ErrorCode::InvalidCredentials => "Credenciales inválidas",
            ErrorCode::TokenExpired => "La sesión ha expirado",
            ErrorCode::TokenInvalid => "Sesión inválida",
            ErrorCode::SessionExpired => "La sesión ha expirado",
            ErrorCode::AccountDisabled => "La cuenta está deshabilitada",
            ErrorCode::TooManyRequests => {
                "Demasiados intentos. Intenta nuevamente en un minuto"
            }

            // Permission
            ErrorCode::PermissionDenied => "No autorizado",
            ErrorCode::AdminRequired => "Se requiere acceso de administrador",
            ErrorCode::TenantMismatch => "No autorizado para este restaurante",

            // Tenant
            ErrorCode::RestaurantNotFound => "Restaurante no encontrado",
            ErrorCode::SlugTaken => "El slug ya está en uso",
            ErrorCode::ReservedSlug => "Este slug está reservado",
            ErrorCode::InvalidSlug => "Slug inválido",

            // Menu
            ErrorCode::MenuItemNotFound => "Producto no encontrado",
            ErrorCode::InvalidPrice => "Precio inválido",
            ErrorCode::CategoryNotFound => "Categoría no encontrada",
            ErrorCode::InvalidDiscount => "El descuento debe estar entre 0 y 100",
            ErrorCode::InvalidSchedule => "Horario inválido",

            // File Upload
            ErrorCode::FileTooLarge => "El archivo es demasiado grande",
            ErrorCode::UnsupportedFileFormat => "Formato de archivo no soportado",
            ErrorCode::InvalidImageFile => "Imagen inválida",
            ErrorCode::EmptyFile => "El archivo está vacío",
            ErrorCode::FileStorageFailed => "Error al guardar el archivo",

            // System
            ErrorCode::InternalError => "Error interno del servidor",
            ErrorCode::DatabaseError => "Error de base de datos",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::SessionExpired),
            1007 => Ok(ErrorCode::AccountDisabled),
            1008 => Ok(ErrorCode::TooManyRequests),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2006 => Ok(ErrorCode::TenantMismatch),

            // Tenant
            3002 => Ok(ErrorCode::RestaurantNotFound),
            3101 => Ok(ErrorCode::SlugTaken),
            3102 => Ok(ErrorCode::ReservedSlug),
            3103 => Ok(ErrorCode::InvalidSlug),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::InvalidPrice),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6201 => Ok(ErrorCode::InvalidDiscount),
            6202 => Ok(ErrorCode::InvalidSchedule),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6505 => Ok(ErrorCode::EmptyFile),
            6509 => Ok(ErrorCode::FileStorageFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
