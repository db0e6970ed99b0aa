//! Remote-control contract: decoded frames, button identities, and the
//! (address, command) table for the handset shipped with the prop.

use heapless::LinearMap;

/// One decoded remote frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemoteFrame {
    /// A full frame carrying the handset address and command bytes.
    Press { addr: u8, cmd: u8 },
    /// A repeat tail: the last button is still held down.
    Repeat,
}

/// Non-blocking receiver contract.
///
/// `poll` hands out at most one frame and then latches: further polls return
/// nothing until [`Receiver::resume`] re-arms the receiver. A caller that
/// accepts a frame and forgets to resume loses the remote for good, so the
/// dispatcher resumes on every accepted decode path without exception.
pub trait Receiver {
    /// The next decoded frame, if a complete one is waiting.
    fn poll(&mut self) -> Option<RemoteFrame>;

    /// False while a frame may be in flight; long draws must wait.
    fn is_idle(&self) -> bool;

    /// Re-arm after an accepted frame.
    fn resume(&mut self);
}

/// Buttons on the prop's handset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    ChMinus,
    ChPlus,
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Seven,
    Eight,
    Nine,
    Prev,
    Next,
    Pause,
    Eq,
}

/// Address byte the handset transmits on.
pub const REMOTE_ADDR: u8 = 0x00;

// Command bytes as the handset sends them.
const BUTTON_CODES: [(u8, Button); 15] = [
    (0x45, Button::ChMinus),
    (0x47, Button::ChPlus),
    (0x16, Button::Zero),
    (0x0C, Button::One),
    (0x18, Button::Two),
    (0x5E, Button::Three),
    (0x08, Button::Four),
    (0x1C, Button::Five),
    (0x42, Button::Seven),
    (0x52, Button::Eight),
    (0x4A, Button::Nine),
    (0x44, Button::Prev),
    (0x40, Button::Next),
    (0x43, Button::Pause),
    (0x19, Button::Eq),
];

/// `(address, command)` → [`Button`] lookup.
pub struct ButtonMap {
    map: LinearMap<(u8, u8), Button, 16>,
}

impl ButtonMap {
    /// The table for the handset shipped with the prop.
    #[must_use]
    pub fn standard() -> Self {
        let mut map = LinearMap::new();
        for &(cmd, button) in &BUTTON_CODES {
            let _ = map.insert((REMOTE_ADDR, cmd), button);
        }
        Self { map }
    }

    /// Identify a frame's button; unknown codes return `None`.
    #[must_use]
    pub fn lookup(&self, addr: u8, cmd: u8) -> Option<Button> {
        self.map.get(&(addr, cmd)).copied()
    }
}
