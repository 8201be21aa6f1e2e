//! Adobe Glyph List: glyph name → Unicode scalar value.
//!
//! The full AGL has ~4300 entries; this carries the subset that shows up in
//! practice when a font's `/Differences` array or a non-embedded Type0 font
//! names glyphs by their Adobe glyph name instead of supplying a ToUnicode
//! CMap. Unmapped glyph names fall through to U+FFFD per the font decoding
//! contract, so growing this table only ever improves recall.

use phf::phf_map;

/// Static glyph-name → Unicode lookup table (perfect hash, built at compile time).
pub static ADOBE_GLYPH_LIST: phf::Map<&'static str, char> = phf_map! {
    "space" => ' ', "exclam" => '!', "quotedbl" => '"', "numbersign" => '#',
    "dollar" => '$', "percent" => '%', "ampersand" => '&', "quotesingle" => '\'',
    "parenleft" => '(', "parenright" => ')', "asterisk" => '*', "plus" => '+',
    "comma" => ',', "hyphen" => '-', "period" => '.', "slash" => '/',
    "zero" => '0', "one" => '1', "two" => '2', "three" => '3', "four" => '4',
    "five" => '5', "six" => '6', "seven" => '7', "eight" => '8', "nine" => '9',
    "colon" => ':', "semicolon" => ';', "less" => '<', "equal" => '=',
    "greater" => '>', "question" => '?', "at" => '@',
    "A" => 'A', "B" => 'B', "C" => 'C', "D" => 'D', "E" => 'E', "F" => 'F',
    "G" => 'G', "H" => 'H', "I" => 'I', "J" => 'J', "K" => 'K', "L" => 'L',
    "M" => 'M', "N" => 'N', "O" => 'O', "P" => 'P', "Q" => 'Q', "R" => 'R',
    "S" => 'S', "T" => 'T', "U" => 'U', "V" => 'V', "W" => 'W', "X" => 'X',
    "Y" => 'Y', "Z" => 'Z',
    "bracketleft" => '[', "backslash" => '\\', "bracketright" => ']',
    "asciicircum" => '^', "underscore" => '_', "grave" => '`',
    "a" => 'a', "b" => 'b', "c" => 'c', "d" => 'd', "e" => 'e', "f" => 'f',
    "g" => 'g', "h" => 'h', "i" => 'i', "j" => 'j', "k" => 'k', "l" => 'l',
    "m" => 'm', "n" => 'n', "o" => 'o', "p" => 'p', "q" => 'q', "r" => 'r',
    "s" => 's', "t" => 't', "u" => 'u', "v" => 'v', "w" => 'w', "x" => 'x',
    "y" => 'y', "z" => 'z',
    "braceleft" => '{', "bar" => '|', "braceright" => '}', "asciitilde" => '~',
    "exclamdown" => '¡', "cent" => '¢', "sterling" => '£', "currency" => '¤',
    "yen" => '¥', "brokenbar" => '¦', "section" => '§', "dieresis" => '¨',
    "copyright" => '©', "ordfeminine" => 'ª', "guillemotleft" => '«',
    "logicalnot" => '¬', "registered" => '®', "macron" => '¯', "degree" => '°',
    "plusminus" => '±', "acute" => '´', "mu" => 'µ', "paragraph" => '¶',
    "periodcentered" => '·', "cedilla" => '¸', "ordmasculine" => 'º',
    "guillemotright" => '»', "onequarter" => '¼', "onehalf" => '½',
    "threequarters" => '¾', "questiondown" => '¿',
    "Agrave" => 'À', "Aacute" => 'Á', "Acircumflex" => 'Â', "Atilde" => 'Ã',
    "Adieresis" => 'Ä', "Aring" => 'Å', "AE" => 'Æ', "Ccedilla" => 'Ç',
    "Egrave" => 'È', "Eacute" => 'É', "Ecircumflex" => 'Ê', "Edieresis" => 'Ë',
    "Igrave" => 'Ì', "Iacute" => 'Í', "Icircumflex" => 'Î', "Idieresis" => 'Ï',
    "Eth" => 'Ð', "Ntilde" => 'Ñ', "Ograve" => 'Ò', "Oacute" => 'Ó',
    "Ocircumflex" => 'Ô', "Otilde" => 'Õ', "Odieresis" => 'Ö', "multiply" => '×',
    "Oslash" => 'Ø', "Ugrave" => 'Ù', "Uacute" => 'Ú', "Ucircumflex" => 'Û',
    "Udieresis" => 'Ü', "Yacute" => 'Ý', "Thorn" => 'Þ', "germandbls" => 'ß',
    "agrave" => 'à', "aacute" => 'á', "acircumflex" => 'â', "atilde" => 'ã',
    "adieresis" => 'ä', "aring" => 'å', "ae" => 'æ', "ccedilla" => 'ç',
    "egrave" => 'è', "eacute" => 'é', "ecircumflex" => 'ê', "edieresis" => 'ë',
    "igrave" => 'ì', "iacute" => 'í', "icircumflex" => 'î', "idieresis" => 'ï',
    "eth" => 'ð', "ntilde" => 'ñ', "ograve" => 'ò', "oacute" => 'ó',
    "ocircumflex" => 'ô', "otilde" => 'õ', "odieresis" => 'ö', "divide" => '÷',
    "oslash" => 'ø', "ugrave" => 'ù', "uacute" => 'ú', "ucircumflex" => 'û',
    "udieresis" => 'ü', "yacute" => 'ý', "thorn" => 'þ', "ydieresis" => 'ÿ',
    "quoteleft" => '\u{2018}', "quoteright" => '\u{2019}',
    "quotedblleft" => '\u{201C}', "quotedblright" => '\u{201D}',
    "quotesinglbase" => '\u{201A}', "quotedblbase" => '\u{201E}',
    "bullet" => '\u{2022}', "ellipsis" => '\u{2026}', "endash" => '\u{2013}',
    "emdash" => '\u{2014}', "trademark" => '\u{2122}', "perthousand" => '\u{2030}',
    "minus" => '\u{2212}', "fraction" => '\u{2044}', "florin" => '\u{0192}',
    "circumflex" => '\u{02C6}', "tilde" => '\u{02DC}', "dotlessi" => '\u{0131}',
    "fi" => '\u{FB01}', "fl" => '\u{FB02}', "ff" => '\u{FB00}',
    "ffi" => '\u{FB03}', "ffl" => '\u{FB04}',
    "Lslash" => 'Ł', "lslash" => 'ł', "Scaron" => 'Š', "scaron" => 'š',
    "Zcaron" => 'Ž', "zcaron" => 'ž', "Oacute" => 'Ó', "OE" => 'Œ', "oe" => 'œ',
    "Ydieresis" => 'Ÿ', "breve" => '\u{02D8}', "dotaccent" => '\u{02D9}',
    "ring" => '\u{02DA}', "ogonek" => '\u{02DB}', "hungarumlaut" => '\u{02DD}',
    "caron" => 'ˇ',
};
