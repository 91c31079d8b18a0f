//! Character remap tables
//!
//! The controller's character ROM is not Unicode. A [`CharTable`] maps the
//! characters an application writes onto ROM codes; anything the table does
//! not list is sent as its code point truncated to a byte, which is right for
//! ASCII and wrong for everything else.

/// A static, read-only `char -> ROM code` table
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharTable {
    entries: &'static [(char, u8)],
}

impl Default for CharTable {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl CharTable {
    /// Table without entries, every character passes through
    pub const EMPTY: CharTable = CharTable::new(&[]);

    /// Wrap a list of `(character, ROM code)` pairs
    pub const fn new(entries: &'static [(char, u8)]) -> Self {
        Self { entries }
    }

    /// ROM code for `ch`
    pub fn remap(&self, ch: char) -> u8 {
        self.entries
            .iter()
            .find(|&&(from, _)| from == ch)
            .map_or(ch as u32 as u8, |&(_, code)| code)
    }

    /// Remap every character of `text`
    pub fn encode<'t>(&'t self, text: &'t str) -> impl Iterator<Item = u8> + 't {
        text.chars().map(move |ch| self.remap(ch))
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cyrillic alphabet for the common "Cyrillic ROM" 1602 modules.
///
/// Letters that look like Latin ones reuse the Latin glyph.
pub static CYRILLIC: CharTable = CharTable::new(&[
    ('А', 65),
    ('Б', 160),
    ('В', 66),
    ('Г', 161),
    ('Д', 224),
    ('Е', 69),
    ('Ё', 162),
    ('Ж', 163),
    ('З', 164),
    ('И', 165),
    ('Й', 166),
    ('К', 75),
    ('Л', 167),
    ('М', 77),
    ('Н', 72),
    ('О', 79),
    ('П', 168),
    ('Р', 80),
    ('С', 67),
    ('Т', 84),
    ('У', 169),
    ('Ф', 170),
    ('Х', 88),
    ('Ц', 225),
    ('Ч', 171),
    ('Ш', 172),
    ('Щ', 226),
    ('Ъ', 173),
    ('Ы', 174),
    ('Ь', 98),
    ('Э', 175),
    ('Ю', 176),
    ('Я', 177),
    ('а', 97),
    ('б', 178),
    ('в', 179),
    ('г', 180),
    ('д', 227),
    ('е', 101),
    ('ё', 181),
    ('ж', 182),
    ('з', 183),
    ('и', 184),
    ('й', 185),
    ('к', 186),
    ('л', 187),
    ('м', 188),
    ('н', 189),
    ('о', 111),
    ('п', 190),
    ('р', 112),
    ('с', 99),
    ('т', 191),
    ('у', 121),
    ('ф', 228),
    ('х', 120),
    ('ц', 229),
    ('ч', 192),
    ('ш', 193),
    ('щ', 230),
    ('ъ', 194),
    ('ы', 195),
    ('ь', 196),
    ('э', 197),
    ('ю', 198),
    ('я', 199),
]);
