//! SSD1963 command codes and window helpers used by the fill demo

/// SSD1963 command set (subset used by dispatch)
pub mod cmd {
    /// Column range of the write window
    pub const SET_COLUMN_ADDRESS: u16 = 0x2A;
    /// Row (page) range of the write window
    pub const SET_PAGE_ADDRESS: u16 = 0x2B;
    /// Start streaming pixels into the window
    pub const WRITE_MEMORY_START: u16 = 0x2C;
}

/// RGB565 colour streamed by the fill demo
pub const FILL_COLOR: u16 = 0x0760;

/// Rectangular write window, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub start_x: u16,
    pub start_y: u16,
    pub end_x: u16,
    pub end_y: u16,
}

impl Window {
    /// Square window `[f, f] .. [2f, 2f]`
    pub fn square(factor: u8) -> Self {
        let start = u16::from(factor);
        let end = start * 2;
        Self {
            start_x: start,
            start_y: start,
            end_x: end,
            end_y: end,
        }
    }

    /// Data words following `SET_COLUMN_ADDRESS`
    pub fn column_words(&self) -> [u16; 4] {
        range_words(self.start_x, self.end_x)
    }

    /// Data words following `SET_PAGE_ADDRESS`
    pub fn page_words(&self) -> [u16; 4] {
        range_words(self.start_y, self.end_y)
    }
}

/// The controller takes each 16-bit coordinate as two 8-bit data writes
fn range_words(start: u16, end: u16) -> [u16; 4] {
    [start >> 8, start & 0xFF, end >> 8, end & 0xFF]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_window() {
        let w = Window::square(200);
        assert_eq!(w.start_x, 200);
        assert_eq!(w.end_y, 400);
        assert_eq!(w.column_words(), [0x00, 200, 0x01, 0x90]);
        assert_eq!(w.page_words(), w.column_words());
    }

    #[test]
    fn test_zero_window() {
        assert_eq!(Window::square(0).column_words(), [0, 0, 0, 0]);
    }
}
