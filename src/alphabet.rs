use crate::alphabets::KnownAlphabet;
use crate::error::{CbResult, CipherBreakError};
use fastrand::Rng;

/// Value used in index maps for a character that is not part of the alphabet.
pub const SYMBOL_NOT_FOUND: u8 = 255;

/// Largest alphabet that still leaves room for the `SYMBOL_NOT_FOUND` sentinel.
pub const MAX_ALPHABET_SIZE: usize = 254;

/// An ordered set of distinct single-byte symbols.
///
/// The position of a symbol is its index everywhere else in the crate:
/// tensor axes, key slots and the symbol-index form of a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    index_map: [u8; 256],
}

impl Alphabet {
    pub fn preset(preset: KnownAlphabet) -> CbResult<Self> {
        Self::new(preset.symbols())
    }

    pub fn new(symbols: &str) -> CbResult<Self> {
        let chars: Vec<char> = symbols.chars().collect();

        if chars.len() < 2 {
            return Err(CipherBreakError::Config(format!(
                "alphabet needs at least 2 symbols, got {}",
                chars.len()
            )));
        }
        if chars.len() > MAX_ALPHABET_SIZE {
            return Err(CipherBreakError::Config(format!(
                "alphabet has {} symbols, the limit is {}",
                chars.len(),
                MAX_ALPHABET_SIZE
            )));
        }

        let mut index_map = [SYMBOL_NOT_FOUND; 256];
        let mut bytes = Vec::with_capacity(chars.len());

        for (i, c) in chars.iter().enumerate() {
            if !c.is_ascii() {
                return Err(CipherBreakError::Config(format!(
                    "alphabet symbol '{}' is not a single-byte (ASCII) character",
                    c
                )));
            }
            let b = *c as u8;
            if index_map[b as usize] != SYMBOL_NOT_FOUND {
                return Err(CipherBreakError::Config(format!(
                    "alphabet symbol '{}' appears more than once",
                    c
                )));
            }
            index_map[b as usize] = i as u8;
            bytes.push(b);
        }

        Ok(Self {
            symbols: bytes,
            index_map,
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn symbol(&self, idx: usize) -> char {
        self.symbols[idx] as char
    }

    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(&self.symbols).into_owned()
    }

    #[inline(always)]
    pub fn index_of(&self, c: char) -> Option<usize> {
        if !c.is_ascii() {
            return None;
        }
        match self.index_map[c as usize] {
            SYMBOL_NOT_FOUND => None,
            idx => Some(idx as usize),
        }
    }

    pub fn contains(&self, c: char) -> bool {
        self.index_of(c).is_some()
    }

    /// Symbol-index form of `text`: one entry per character, `SYMBOL_NOT_FOUND`
    /// for characters outside the alphabet.
    pub fn index_text(&self, text: &str) -> Vec<u8> {
        text.chars()
            .map(|c| {
                self.index_of(c)
                    .map(|i| i as u8)
                    .unwrap_or(SYMBOL_NOT_FOUND)
            })
            .collect()
    }

    /// Substitutes every alphabet symbol by the key symbol at the same position.
    pub fn encode(&self, plaintext: &str, key: &Key) -> String {
        plaintext
            .chars()
            .map(|c| match self.index_of(c) {
                Some(i) => key
                    .slots
                    .get(i)
                    .map(|&s| self.symbols[s as usize] as char)
                    .unwrap_or(c),
                None => c,
            })
            .collect()
    }

    /// Inverse of [`Alphabet::encode`]: the key symbol at position `p` becomes
    /// the alphabet symbol at position `p`.
    pub fn decode(&self, ciphertext: &str, key: &Key) -> String {
        ciphertext
            .chars()
            .map(|c| match self.index_of(c) {
                Some(s) => key
                    .positions
                    .get(s)
                    .map(|&p| self.symbols[p as usize] as char)
                    .unwrap_or(c),
                None => c,
            })
            .collect()
    }

    /// Uniformly random permutation of the alphabet.
    pub fn random_key(&self, rng: &mut Rng) -> Key {
        let mut slots: Vec<u8> = (0..self.len() as u8).collect();
        rng.shuffle(&mut slots);
        Key::from_slots(slots)
    }
}

/// A substitution key: a bijection between alphabet positions and alphabet symbols.
///
/// Only constructible as a valid permutation, so every `Key` in the program is
/// a bijection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    // slots[p]: alphabet index of the symbol at key position p
    slots: Vec<u8>,
    // positions[s]: key position holding alphabet index s
    positions: Vec<u8>,
}

impl Key {
    /// Parses a key written with the symbols of `alphabet`.
    pub fn parse(key: &str, alphabet: &Alphabet) -> CbResult<Self> {
        let n = alphabet.len();
        let chars: Vec<char> = key.chars().collect();

        if chars.len() != n {
            return Err(CipherBreakError::InvalidKey(format!(
                "key has {} symbols, alphabet has {}",
                chars.len(),
                n
            )));
        }

        let mut seen = vec![false; n];
        let mut slots = Vec::with_capacity(n);

        for c in chars {
            let idx = alphabet.index_of(c).ok_or_else(|| {
                CipherBreakError::InvalidKey(format!("symbol '{}' is not in the alphabet", c))
            })?;
            if seen[idx] {
                return Err(CipherBreakError::InvalidKey(format!(
                    "symbol '{}' is used more than once",
                    c
                )));
            }
            seen[idx] = true;
            slots.push(idx as u8);
        }

        Ok(Self::from_slots(slots))
    }

    /// The key equal to the alphabet itself; encoding with it is a no-op.
    pub fn identity(alphabet: &Alphabet) -> Self {
        Self::from_slots((0..alphabet.len() as u8).collect())
    }

    // Callers guarantee `slots` is a permutation of 0..slots.len().
    fn from_slots(slots: Vec<u8>) -> Self {
        let mut positions = vec![0u8; slots.len()];
        for (p, &s) in slots.iter().enumerate() {
            positions[s as usize] = p as u8;
        }
        Self { slots, positions }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Alphabet index of the symbol stored at key position `pos`.
    #[inline(always)]
    pub fn slot(&self, pos: usize) -> usize {
        self.slots[pos] as usize
    }

    /// Key position holding the alphabet symbol with index `symbol`.
    #[inline(always)]
    pub fn position_of(&self, symbol: usize) -> Option<usize> {
        self.positions.get(symbol).map(|&p| p as usize)
    }

    /// A new key with positions `a` and `b` exchanged.
    ///
    /// # Panics
    ///
    /// Panics if `a` or `b` is not below [`Key::len`].
    pub fn swapped(&self, a: usize, b: usize) -> Self {
        let mut next = self.clone();
        next.slots.swap(a, b);
        next.positions[next.slots[a] as usize] = a as u8;
        next.positions[next.slots[b] as usize] = b as u8;
        next
    }

    /// Decodes a symbol-index text in place of the character form.
    /// Indices this key has no slot for, `SYMBOL_NOT_FOUND` included, come
    /// out as `SYMBOL_NOT_FOUND`.
    pub fn decode_indices(&self, cipher: &[u8], out: &mut Vec<u8>) {
        out.clear();
        out.extend(cipher.iter().map(|&s| {
            self.positions
                .get(s as usize)
                .copied()
                .unwrap_or(SYMBOL_NOT_FOUND)
        }));
    }

    pub fn render(&self, alphabet: &Alphabet) -> String {
        self.slots.iter().map(|&s| alphabet.symbol(s as usize)).collect()
    }
}
