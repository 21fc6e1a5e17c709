//! 分割単位モードの定義
//!
//! 同じ入力文に対して、短単位・中単位・長単位の3種類の粒度で
//! 形態素列を取り出すことができます。中単位がコストの調整された
//! 基準粒度であり、デフォルトです。

use std::str::FromStr;

/// 分割単位モード
///
/// Viterbi探索は常に中単位の形態素列を解決し、本モードに応じて
/// 結果が再分割(短単位)または結合(長単位)されます。
///
/// - [`Mode::Short`] - 辞書に登録された最小の分割単位まで展開します。
/// - [`Mode::Medium`] - 探索結果をそのまま返します(デフォルト)。
/// - [`Mode::Long`] - 登録された複合語の構成列に一致する連続トークンを結合します。
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    /// 短単位(A)
    Short,

    /// 中単位(B)。デフォルト。
    #[default]
    Medium,

    /// 長単位(C)
    Long,
}

/// `Mode` の `FromStr` 実装
impl FromStr for Mode {
    type Err = &'static str;

    /// 文字列から分割単位モードをパースする
    ///
    /// 英語名(`short`/`medium`/`long`)と一文字表記(`A`/`B`/`C`)の
    /// 両方を受け付けます。大文字小文字は区別しません。
    ///
    /// # 引数
    ///
    /// * `mode` - パース対象の文字列
    ///
    /// # 戻り値
    ///
    /// パースに成功した場合は対応する `Mode`、失敗した場合はエラーメッセージ
    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode.to_ascii_lowercase().as_str() {
            "short" | "a" => Ok(Self::Short),
            "medium" | "b" => Ok(Self::Medium),
            "long" | "c" => Ok(Self::Long),
            _ => Err("Could not parse a mode"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!(Mode::from_str("short"), Ok(Mode::Short));
        assert_eq!(Mode::from_str("B"), Ok(Mode::Medium));
        assert_eq!(Mode::from_str("c"), Ok(Mode::Long));
        assert!(Mode::from_str("x").is_err());
    }

    #[test]
    fn test_default() {
        assert_eq!(Mode::default(), Mode::Medium);
    }
}
