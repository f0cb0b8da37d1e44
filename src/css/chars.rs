//! Character classifier: a static per-code-point bitmask table.
//!
//! The tokenizer never branches on individual characters to decide whether
//! they can start or continue an identifier; it looks the code point up in
//! [`TABLE`] instead. Code points at or above 256 are treated as identifier
//! material (the `nonascii` production of the CSS3 lexical grammar).

use bitflags::bitflags;

bitflags! {
    /// Lexical classes a character may belong to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CharClass: u8 {
        /// `[0-9a-fA-F]`
        const HEX_DIGIT = 1 << 0;
        /// `nmstart`: may begin an identifier (escapes included via `\`).
        const IDENT_START = 1 << 1;
        /// `nmchar`: may continue an identifier.
        const IDENT = 1 << 2;
        /// Space, tab, LF, FF, CR.
        const WHITESPACE = 1 << 3;
        /// May appear unquoted inside `url(...)` and inside strings.
        const URL_CHAR = 1 << 4;
    }
}

const W: u8 = CharClass::WHITESPACE.bits();
const U: u8 = CharClass::URL_CHAR.bits();
const S: u8 = CharClass::IDENT_START.bits();
const UI: u8 = CharClass::IDENT.bits() | U;
const USI: u8 = CharClass::IDENT.bits() | S | U;
const UXI: u8 = CharClass::IDENT.bits() | CharClass::HEX_DIGIT.bits() | U;
const UXSI: u8 = CharClass::IDENT.bits() | S | CharClass::HEX_DIGIT.bits() | U;

#[rustfmt::skip]
static TABLE: [u8; 256] = [
    //                                      TAB LF      FF  CR
    0,   0,   0,   0,   0,   0,   0,   0,   0,   W,   W,   0,   W,   W,   0,   0,
    0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,
    // SPC !  "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    W,   U,   0,   U,   U,   U,   U,   0,   0,   0,   U,   U,   U,   UI,  U,   U,
    // 0   1    2    3    4    5    6    7    8    9    :    ;    <    =    >    ?
    UXI, UXI, UXI, UXI, UXI, UXI, UXI, UXI, UXI, UXI, U,   U,   U,   U,   U,   U,
    // @   A    B    C    D    E    F    G    H    I    J    K    L    M    N    O
    U,   UXSI,UXSI,UXSI,UXSI,UXSI,UXSI,USI, USI, USI, USI, USI, USI, USI, USI, USI,
    // P   Q    R    S    T    U    V    W    X    Y    Z    [    \    ]    ^    _
    USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, U,   S,   U,   U,   USI,
    // `   a    b    c    d    e    f    g    h    i    j    k    l    m    n    o
    U,   UXSI,UXSI,UXSI,UXSI,UXSI,UXSI,USI, USI, USI, USI, USI, USI, USI, USI, USI,
    // p   q    r    s    t    u    v    w    x    y    z    {    |    }    ~    DEL
    USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, U,   U,   U,   U,   0,
    // U+0080 .. U+009F (C1 controls)
    0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,
    0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,
    // U+00A0 .. U+00FF
    USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI,
    USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI,
    USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI,
    USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI,
    USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI,
    USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI, USI,
];

/// Classes of `c`. Every code point at or above 256 is an identifier
/// start, an identifier character and a URL character.
#[inline]
pub fn classify(c: char) -> CharClass {
    let code = c as u32;
    if code < 256 {
        CharClass::from_bits_retain(TABLE[code as usize])
    } else {
        CharClass::IDENT_START | CharClass::IDENT | CharClass::URL_CHAR
    }
}

#[inline]
pub fn is_hex_digit(c: char) -> bool {
    classify(c).contains(CharClass::HEX_DIGIT)
}

#[inline]
pub fn is_ident_start(c: char) -> bool {
    classify(c).contains(CharClass::IDENT_START)
}

#[inline]
pub fn is_ident_char(c: char) -> bool {
    classify(c).contains(CharClass::IDENT)
}

#[inline]
pub fn is_whitespace(c: char) -> bool {
    classify(c).contains(CharClass::WHITESPACE)
}

#[inline]
pub fn is_url_char(c: char) -> bool {
    classify(c).contains(CharClass::URL_CHAR)
}
