//! SVG view-box attribute parser
//!
//! See [SVG coordinate systems](https://www.w3.org/TR/SVG11/coords.html#ViewBoxAttribute)
use crate::Scalar;
use std::{
    fmt,
    io::{Cursor, Read},
    str::FromStr,
};

/// Rectangular view region a source document declares as its drawable bounds
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: Scalar,
    pub y: Scalar,
    pub width: Scalar,
    pub height: Scalar,
}

impl ViewBox {
    pub fn new(x: Scalar, y: Scalar, width: Scalar, height: Scalar) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

impl FromStr for ViewBox {
    type Err = ViewBoxError;

    fn from_str(attr: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(Cursor::new(attr));
        let x = parser.parse_scalar()?;
        let y = parser.parse_scalar()?;
        let width = parser.parse_scalar()?;
        let height = parser.parse_scalar()?;
        parser.parse_separators()?;
        if parser.parse_byte()?.is_some() {
            return Err(ViewBoxError::TrailingInput);
        }
        if ![x, y, width, height].iter().all(|value| value.is_finite()) {
            return Err(ViewBoxError::InvalidScalar);
        }
        Ok(ViewBox::new(x, y, width, height))
    }
}

struct Parser<I> {
    input: I,
    input_buffer: Option<u8>,
}

impl<I: Read> Parser<I> {
    pub fn new(input: I) -> Self {
        Self {
            input,
            input_buffer: None,
        }
    }

    // consume single byte from the input
    pub fn parse_byte(&mut self) -> Result<Option<u8>, ViewBoxError> {
        match self.input_buffer.take() {
            None => {
                let mut byte = [0; 1];
                if self.input.read(&mut byte)? != 0 {
                    Ok(Some(byte[0]))
                } else {
                    Ok(None)
                }
            }
            byte => Ok(byte),
        }
    }

    // put byte into input buffer, at most one byte is cached
    pub fn unparse_byte(&mut self, byte: u8) {
        debug_assert!(self.input_buffer.is_none());
        self.input_buffer = Some(byte);
    }

    // consume input while `pred` predicate is true
    pub fn parse_while(
        &mut self,
        mut pred: impl FnMut(u8) -> bool,
        mut proc: impl FnMut(u8),
    ) -> Result<usize, ViewBoxError> {
        let mut count = 0;
        loop {
            let byte = match self.parse_byte()? {
                None => break,
                Some(byte) => byte,
            };
            if !pred(byte) {
                self.unparse_byte(byte);
                break;
            }
            count += 1;
            proc(byte);
        }
        Ok(count)
    }

    // consume at most one byte from the input, if predicate returns true
    pub fn parse_once(
        &mut self,
        pred: impl FnOnce(u8) -> bool,
        proc: impl FnOnce(u8),
    ) -> Result<bool, ViewBoxError> {
        let byte = match self.parse_byte()? {
            None => return Ok(false),
            Some(byte) => byte,
        };
        if pred(byte) {
            proc(byte);
            Ok(true)
        } else {
            self.unparse_byte(byte);
            Ok(false)
        }
    }

    // consume whitespace/comma separators from the input
    pub fn parse_separators(&mut self) -> Result<(), ViewBoxError> {
        loop {
            let byte = match self.parse_byte()? {
                None => break,
                Some(byte) => byte,
            };
            if !matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | b',') {
                self.unparse_byte(byte);
                break;
            }
        }
        Ok(())
    }

    // parse single scalar value from the input
    pub fn parse_scalar(&mut self) -> Result<Scalar, ViewBoxError> {
        self.parse_separators()?;

        let mut mantissa: i64 = 0;
        let mut exponent: i64 = 0;
        let mut sign = 1;

        fn push_digit(value: &mut i64, byte: u8) {
            let digit = byte - b'0';
            *value = value.wrapping_mul(10).wrapping_add(digit as i64);
        }

        self.parse_once(
            |byte| matches!(byte, b'-' | b'+'),
            |byte| {
                if byte == b'-' {
                    sign = -1
                }
            },
        )?;
        let whole = self.parse_while(
            |byte| byte.is_ascii_digit(),
            |byte| push_digit(&mut mantissa, byte),
        )?;
        let matches_dot = self.parse_once(|byte| matches!(byte, b'.'), |_| {})?;
        let frac = if matches_dot {
            self.parse_while(
                |byte| byte.is_ascii_digit(),
                |byte| {
                    push_digit(&mut mantissa, byte);
                    exponent -= 1;
                },
            )?
        } else {
            0
        };
        mantissa *= sign;

        if whole + frac == 0 {
            return Err(ViewBoxError::InvalidScalar);
        }

        let matches_exp = self.parse_once(|byte| matches!(byte, b'e' | b'E'), |_| {})?;
        if matches_exp {
            let mut sci: i64 = 0;
            let mut sci_sign = 1;
            self.parse_once(
                |byte| matches!(byte, b'-' | b'+'),
                |byte| {
                    if byte == b'-' {
                        sci_sign = -1
                    }
                },
            )?;
            if self.parse_while(
                |byte| byte.is_ascii_digit(),
                |byte| push_digit(&mut sci, byte),
            )? == 0
            {
                return Err(ViewBoxError::InvalidScalar);
            }
            exponent = exponent.wrapping_add(sci_sign * sci)
        }

        let ten: Scalar = 10.0;
        Ok((mantissa as Scalar) * ten.powi(exponent as i32))
    }
}

/// Error while parsing a view-box attribute
#[derive(Debug)]
pub enum ViewBoxError {
    /// Failed to parse scalar value (or fewer than four were present)
    InvalidScalar,
    /// Input continues past the fourth scalar
    TrailingInput,
    /// IO error propagated while reading input stream
    IoError(std::io::Error),
}

impl fmt::Display for ViewBoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewBox::{:?}", self)
    }
}

impl From<std::io::Error> for ViewBoxError {
    fn from(error: std::io::Error) -> Self {
        Self::IoError(error)
    }
}

impl std::error::Error for ViewBoxError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() -> Result<(), ViewBoxError> {
        let vb: ViewBox = "0 0 24 24".parse()?;
        assert_eq!(vb, ViewBox::new(0.0, 0.0, 24.0, 24.0));

        let vb: ViewBox = "0,0,24,24".parse()?;
        assert_eq!(vb, ViewBox::new(0.0, 0.0, 24.0, 24.0));

        let vb: ViewBox = " -8.5, 4 1e2 37.25 ".parse()?;
        assert_eq!(vb, ViewBox::new(-8.5, 4.0, 100.0, 37.25));
        Ok(())
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<ViewBox>().is_err());
        assert!("0 0 24".parse::<ViewBox>().is_err());
        assert!("0 0 24 24 7".parse::<ViewBox>().is_err());
        assert!("0 0 twenty 24".parse::<ViewBox>().is_err());
    }

    #[test]
    fn test_display_round_trip() -> Result<(), ViewBoxError> {
        let vb = ViewBox::new(-8.5, 4.0, 100.0, 37.25);
        assert_eq!(vb.to_string(), "-8.5 4 100 37.25");
        assert_eq!(vb.to_string().parse::<ViewBox>()?, vb);
        Ok(())
    }
}
