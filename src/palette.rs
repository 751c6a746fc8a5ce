//! Single-byte color-table pokes

use crate::image::Image;

/// Background color addresses
pub mod background {
    pub const WATER: usize = 0x5DF;
    pub const DAY_SKY: usize = 0x5E0;
    pub const NIGHT_SKY: usize = 0x5E1;
}

/// Object color addresses
pub mod object {
    pub const OW_BUSHES_BRIGHT: usize = 0xCDC;
    pub const OW_BUSHES_DARK: usize = 0xCDD;
    pub const OW_BUSHES_OUTLINE: usize = 0xCDE;
    pub const OW_BRICK_BRIGHT: usize = 0xCE0;
    pub const OW_BRICK_DARK: usize = 0xCE1;

    pub const PLAYER_HAT: usize = 0x5E8;
    pub const PLAYER_SKIN: usize = 0x5E9;
    pub const PLAYER_HAIR: usize = 0x5EA;
}

/// An ordered list of color-table overrides
#[derive(Debug, Clone, Default)]
pub struct Tweaks {
    pub entries: Vec<(usize, u8)>,
}

impl Tweaks {
    pub fn push(&mut self, addr: usize, color: u8) {
        self.entries.push((addr, color));
    }

    pub fn apply(&self, image: &mut Image) {
        for &(addr, color) in &self.entries {
            image.set(addr, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::MAGIC;

    #[test]
    fn test_apply_pokes_in_order() {
        let mut data = vec![0u8; 0x1000];
        data[0..3].copy_from_slice(&MAGIC);
        let mut image = Image::from_bytes(data).unwrap();

        let mut tweaks = Tweaks::default();
        tweaks.push(background::DAY_SKY, 0x2B);
        tweaks.push(object::PLAYER_HAT, 0x16);
        tweaks.push(object::PLAYER_HAT, 0x27); // later poke wins
        tweaks.apply(&mut image);

        assert_eq!(image.get(background::DAY_SKY), 0x2B);
        assert_eq!(image.get(object::PLAYER_HAT), 0x27);
        assert_eq!(image.get(background::WATER), 0);
    }
}
