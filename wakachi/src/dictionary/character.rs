//! 文字クラス定義
//!
//! このモジュールは、未知語処理のための固定の文字クラス分類を提供します。
//! 文字クラスは辞書ファイルではなくコード中に定義され、正規化後の各文字を
//! 漢字・ひらがな・カタカナ・ASCII英数字・空白・句読点・その他のいずれかに
//! 分類します。未知語テンプレート(`unk.def`)はこのクラス名で引かれます。

use std::fmt;

use rkyv::{Archive, Deserialize, Serialize};

/// 未知語処理に使用する文字クラス
///
/// 各クラスは`unk.def`のカテゴリ名(`KANJI`、`HIRAGANA`など)に対応します。
/// どのクラスにも属さない文字は[`CharClass::Default`]に分類されます。
///
/// 空白([`CharClass::Space`])と句読点([`CharClass::Punct`])は
/// グループ化の対象外であり、未知語として常に1文字単位で扱われます。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Clone, Copy, Debug))]
#[repr(u8)]
pub enum CharClass {
    /// 漢字(CJK統合漢字、拡張漢字、々・〆を含む)
    Kanji,

    /// ひらがな
    Hiragana,

    /// カタカナ(長音記号、半角カタカナを含む)
    Katakana,

    /// ASCII英数字
    Ascii,

    /// 空白文字
    Space,

    /// 句読点・記号
    Punct,

    /// その他(どのクラスにも属さない文字)
    Default,
}

/// 文字クラスの総数
pub const NUM_CHAR_CLASSES: usize = 7;

impl CharClass {
    /// 文字を分類します
    ///
    /// 分類は正規化後の文字に対して行われることを想定しています。
    /// 例えば全角英数字はNFKC正規化によって半角に畳み込まれた後に
    /// ここへ到達するため、[`CharClass::Ascii`]に分類されます。
    ///
    /// # 引数
    ///
    /// * `c` - 分類する文字
    ///
    /// # 戻り値
    ///
    /// 対応する文字クラス
    pub fn of(c: char) -> Self {
        if c.is_whitespace() {
            return Self::Space;
        }
        match c {
            '々' | '〆' => Self::Kanji,
            '\u{4E00}'..='\u{9FFF}'
            | '\u{3400}'..='\u{4DBF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{20000}'..='\u{2FA1F}' => Self::Kanji,
            '\u{3041}'..='\u{309F}' => Self::Hiragana,
            '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9D}' => {
                Self::Katakana
            }
            _ if c.is_ascii_alphanumeric() => Self::Ascii,
            _ if c.is_ascii_punctuation() => Self::Punct,
            '\u{3000}'..='\u{303F}' | '\u{2000}'..='\u{206F}' | '\u{FF01}'..='\u{FF65}' => {
                Self::Punct
            }
            _ => Self::Default,
        }
    }

    /// このクラスの文字が未知語としてグループ化可能かどうかを返します
    ///
    /// 空白と句読点は常に1文字単位で扱われるため`false`を返します。
    ///
    /// # 戻り値
    ///
    /// グループ化可能であれば`true`
    #[inline(always)]
    pub const fn is_groupable(self) -> bool {
        !matches!(self, Self::Space | Self::Punct)
    }

    /// クラスのテーブルインデックスを返します
    ///
    /// 未知語テンプレートテーブルの添字として使用されます。
    ///
    /// # 戻り値
    ///
    /// `0..NUM_CHAR_CLASSES`の範囲のインデックス
    #[inline(always)]
    pub const fn as_index(self) -> usize {
        self as usize
    }

    /// `unk.def`のカテゴリ名からクラスを引きます
    ///
    /// # 引数
    ///
    /// * `name` - カテゴリ名(例: `"KANJI"`)
    ///
    /// # 戻り値
    ///
    /// 対応するクラス。未定義の名前の場合は`None`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "KANJI" => Some(Self::Kanji),
            "HIRAGANA" => Some(Self::Hiragana),
            "KATAKANA" => Some(Self::Katakana),
            "ASCII" => Some(Self::Ascii),
            "SPACE" => Some(Self::Space),
            "PUNCT" => Some(Self::Punct),
            "DEFAULT" => Some(Self::Default),
            _ => None,
        }
    }

    /// クラスのカテゴリ名を返します
    ///
    /// # 戻り値
    ///
    /// `unk.def`で使用されるカテゴリ名
    pub const fn name(self) -> &'static str {
        match self {
            Self::Kanji => "KANJI",
            Self::Hiragana => "HIRAGANA",
            Self::Katakana => "KATAKANA",
            Self::Ascii => "ASCII",
            Self::Space => "SPACE",
            Self::Punct => "PUNCT",
            Self::Default => "DEFAULT",
        }
    }

    /// すべてのクラスをテーブルインデックス順で返します
    pub const fn all() -> [Self; NUM_CHAR_CLASSES] {
        [
            Self::Kanji,
            Self::Hiragana,
            Self::Katakana,
            Self::Ascii,
            Self::Space,
            Self::Punct,
            Self::Default,
        ]
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_scripts() {
        assert_eq!(CharClass::of('漢'), CharClass::Kanji);
        assert_eq!(CharClass::of('々'), CharClass::Kanji);
        assert_eq!(CharClass::of('あ'), CharClass::Hiragana);
        assert_eq!(CharClass::of('ア'), CharClass::Katakana);
        assert_eq!(CharClass::of('ー'), CharClass::Katakana);
        assert_eq!(CharClass::of('a'), CharClass::Ascii);
        assert_eq!(CharClass::of('7'), CharClass::Ascii);
    }

    #[test]
    fn test_classify_space_and_punct() {
        assert_eq!(CharClass::of(' '), CharClass::Space);
        assert_eq!(CharClass::of('\t'), CharClass::Space);
        assert_eq!(CharClass::of('。'), CharClass::Punct);
        assert_eq!(CharClass::of('、'), CharClass::Punct);
        assert_eq!(CharClass::of('!'), CharClass::Punct);
        assert_eq!(CharClass::of('…'), CharClass::Punct);
        assert!(!CharClass::Space.is_groupable());
        assert!(!CharClass::Punct.is_groupable());
    }

    #[test]
    fn test_classify_default() {
        assert_eq!(CharClass::of('é'), CharClass::Default);
        assert_eq!(CharClass::of('한'), CharClass::Default);
        assert!(CharClass::Default.is_groupable());
    }

    #[test]
    fn test_names_round_trip() {
        for class in CharClass::all() {
            assert_eq!(CharClass::from_name(class.name()), Some(class));
        }
        assert_eq!(CharClass::from_name("UNDEFINED"), None);
    }

    #[test]
    fn test_indices_are_dense() {
        for (i, class) in CharClass::all().iter().enumerate() {
            assert_eq!(class.as_index(), i);
        }
    }
}
