use serde::Serialize;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl<T> ApiResponse<Option<T>> {
    /// Respuesta exitosa sin datos, con un mensaje explicativo
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(None),
        }
    }
}

// Response de reportes por rango de fechas
#[derive(Debug, Serialize)]
pub struct RangedResponse<T> {
    pub success: bool,
    pub data: T,
    pub range: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> RangedResponse<T> {
    pub fn new(data: T, range: &'static str) -> Self {
        Self {
            success: true,
            data,
            range,
            count: None,
        }
    }
}

impl<T> RangedResponse<Vec<T>> {
    pub fn list(data: Vec<T>, range: &'static str) -> Self {
        let count = data.len();
        Self {
            success: true,
            data,
            range,
            count: Some(count),
        }
    }
}

// Response simple con mensaje
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
