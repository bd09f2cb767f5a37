//! Blocking HTTP access port trait.

use crate::domain::error::BuffetError;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

pub trait HttpPort {
    /// Transport failures are errors; any HTTP status is a response.
    fn get(&self, url: &str) -> Result<HttpResponse, BuffetError>;
}
