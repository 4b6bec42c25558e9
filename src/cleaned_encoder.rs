use crate::Result;
use crate::strip::Cleaned;

pub trait CleanedEncoder {
    fn write_cleaned(&mut self, cleaned: &Cleaned) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}
