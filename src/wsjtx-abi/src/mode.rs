// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

/// Digital mode identifiers understood by the bridge.
///
/// The discriminants are the wire values crossing the C boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Mode {
    Ft8 = 0,
    Ft4 = 1,
    Jt4 = 2,
    Jt65 = 3,
    Jt9 = 4,
    Fst4 = 5,
    Q65 = 6,
    Fst4w = 7,
    Wspr = 8,
}

impl Mode {
    pub const ALL: [Mode; 9] = [
        Mode::Ft8,
        Mode::Ft4,
        Mode::Jt4,
        Mode::Jt65,
        Mode::Jt9,
        Mode::Fst4,
        Mode::Q65,
        Mode::Fst4w,
        Mode::Wspr,
    ];

    pub fn from_raw(raw: i32) -> Option<Mode> {
        Self::ALL.iter().copied().find(|m| *m as i32 == raw)
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Ft8 => "FT8",
            Mode::Ft4 => "FT4",
            Mode::Jt4 => "JT4",
            Mode::Jt65 => "JT65",
            Mode::Jt9 => "JT9",
            Mode::Fst4 => "FST4",
            Mode::Q65 => "Q65",
            Mode::Fst4w => "FST4W",
            Mode::Wspr => "WSPR",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
