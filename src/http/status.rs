use std::fmt::Display;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum HttpStatusCode {
    OK,
    BadRequest,
    NotFound,
    InternalServerError,
}

impl HttpStatusCode {
    pub fn code(&self) -> u16 {
        match self {
            HttpStatusCode::OK => 200,
            HttpStatusCode::BadRequest => 400,
            HttpStatusCode::NotFound => 404,
            HttpStatusCode::InternalServerError => 500,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            HttpStatusCode::OK => "OK",
            HttpStatusCode::BadRequest => "Bad Request",
            HttpStatusCode::NotFound => "Not Found",
            HttpStatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

impl Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}
