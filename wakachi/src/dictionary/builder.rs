//! 辞書構築のためのビルダー
//!
//! このモジュールは、CSV形式の辞書ソースファイルから [`DictionaryInner`] を
//! 構築するためのビルダーを提供します。

use std::io::Read;

use crate::dictionary::connector::MatrixConnector;
use crate::dictionary::lexicon::Lexicon;
use crate::dictionary::unknown::UnkHandler;
use crate::dictionary::{DictionaryInner, LexType};
use crate::errors::{Result, WakachiError};

use super::lexicon::RawWordEntry;

/// システム辞書エントリから [`DictionaryInner`] を構築するビルダー
pub struct SystemDictionaryBuilder {}

impl SystemDictionaryBuilder {
    /// パースされたコンポーネントから `DictionaryInner` を構築します。
    ///
    /// # 引数
    ///
    /// * `system_word_entries` - システム辞書の単語エントリ
    /// * `connector` - 接続コスト計算器
    /// * `unk_handler` - 未知語ハンドラー
    ///
    /// # 戻り値
    ///
    /// 成功時は `Ok(DictionaryInner)` を返します。
    ///
    /// # エラー
    ///
    /// 辞書の検証に失敗した場合にエラーを返します。
    pub(crate) fn build(
        system_word_entries: &[RawWordEntry],
        connector: MatrixConnector,
        unk_handler: UnkHandler,
    ) -> Result<DictionaryInner> {
        let system_lexicon = Lexicon::from_entries(system_word_entries, LexType::System)?;

        if !system_lexicon.verify(&connector) {
            return Err(WakachiError::invalid_argument(
                "system_lexicon_rdr",
                "system_lexicon_rdr includes invalid connection ids.",
            ));
        }
        if !unk_handler.verify(&connector) {
            return Err(WakachiError::invalid_argument(
                "unk_handler_rdr",
                "unk_handler_rdr includes invalid connection ids.",
            ));
        }

        Ok(DictionaryInner {
            system_lexicon,
            user_lexicon: None,
            connector,
            unk_handler,
        })
    }

    /// CSV形式のシステムエントリから新しい [`DictionaryInner`] を作成します。
    ///
    /// # 引数
    ///
    ///  - `system_lexicon_rdr`: 辞書ファイル `*.csv` のリーダー
    ///  - `connector_rdr`: 接続行列ファイル `matrix.def` のリーダー
    ///  - `unk_handler_rdr`: 未知語定義ファイル `unk.def` のリーダー
    ///
    /// # エラー
    ///
    /// 入力フォーマットが不正な場合に [`WakachiError`] を返します。
    pub fn from_readers<S, C, U>(
        mut system_lexicon_rdr: S,
        connector_rdr: C,
        unk_handler_rdr: U,
    ) -> Result<DictionaryInner>
    where
        S: Read,
        C: Read,
        U: Read,
    {
        let mut system_lexicon_buf = vec![];
        system_lexicon_rdr.read_to_end(&mut system_lexicon_buf)?;
        let system_word_entries = Lexicon::parse_csv(&system_lexicon_buf, "lexicon.csv")?;
        let connector = MatrixConnector::from_reader(connector_rdr)?;
        let unk_handler = UnkHandler::from_reader(unk_handler_rdr)?;

        Self::build(&system_word_entries, connector, unk_handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oor_lex() {
        let lexicon_csv = "自然,1,1,0,名詞,普通名詞,一般,*,シゼン,自然,*,A,*";
        let matrix_def = "1 1\n0 0 0";
        let unk_def = "DEFAULT,0,0,100,補助記号,一般,*,*";

        let result = SystemDictionaryBuilder::from_readers(
            lexicon_csv.as_bytes(),
            matrix_def.as_bytes(),
            unk_def.as_bytes(),
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_oor_unk() {
        let lexicon_csv = "自然,0,0,0,名詞,普通名詞,一般,*,シゼン,自然,*,A,*";
        let matrix_def = "1 1\n0 0 0";
        let unk_def = "DEFAULT,1,1,100,補助記号,一般,*,*";

        let result = SystemDictionaryBuilder::from_readers(
            lexicon_csv.as_bytes(),
            matrix_def.as_bytes(),
            unk_def.as_bytes(),
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_user_lexicon_oor() {
        let lexicon_csv = "自然,0,0,0,名詞,普通名詞,一般,*,シゼン,自然,*,A,*";
        let matrix_def = "1 1\n0 0 0";
        let unk_def = "DEFAULT,0,0,100,補助記号,一般,*,*";

        let dict = SystemDictionaryBuilder::from_readers(
            lexicon_csv.as_bytes(),
            matrix_def.as_bytes(),
            unk_def.as_bytes(),
        )
        .unwrap();

        let user_csv = "言語,2,2,0,名詞,普通名詞,一般,*,ゲンゴ,言語,*,A,*";
        let result = dict.reset_user_lexicon_from_reader(Some(user_csv.as_bytes()));

        assert!(result.is_err());
    }
}
