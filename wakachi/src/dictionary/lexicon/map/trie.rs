//! トライ構造による高速文字列検索
//!
//! このモジュールは、ダブル配列トライを使用した高速な共通接頭辞検索を提供します。
//! ダブル配列の本体は単なるバイト列であるため、rkyvアーカイブからも
//! コピーなしでそのまま検索に使用できます。

use rkyv::{Archive, Deserialize, Serialize};
use yada::builder::DoubleArrayBuilder;
use yada::DoubleArray;

use crate::errors::{Result, WakachiError};
use crate::num::U31;

/// ダブル配列トライ
///
/// キーはUTF-8バイト列として格納されます。検索はバイト単位で進むため、
/// マッチ長はバイト長から文字長へ変換した上で[`TrieMatch`]として報告されます。
#[derive(Archive, Serialize, Deserialize)]
pub struct Trie {
    data: Vec<u8>,
}

impl Trie {
    /// レコードからトライを構築します。
    ///
    /// キーはバイト列として昇順でソート済みであり、重複や空文字列を
    /// 含まないことが前提です。値はダブル配列の制約により31ビットに
    /// 収まる必要があります。
    ///
    /// # 引数
    ///
    /// * `records` - キーと値のペアのスライス
    ///
    /// # 戻り値
    ///
    /// 構築されたトライ。制約違反の場合は
    /// [`InvalidArgumentError`](crate::errors::InvalidArgumentError)
    pub fn from_records<K>(records: &[(K, u32)]) -> Result<Self>
    where
        K: AsRef<str>,
    {
        let mut keyset = Vec::with_capacity(records.len());
        for (k, v) in records {
            let v = U31::new(*v).ok_or_else(|| {
                WakachiError::invalid_argument("records", "value must fit in 31 bits")
            })?;
            keyset.push((k.as_ref().as_bytes(), v.get()));
        }
        let data = DoubleArrayBuilder::build(&keyset).ok_or_else(|| {
            WakachiError::invalid_argument("records", "failed to build a double-array trie")
        })?;
        Ok(Self { data })
    }

    /// 共通接頭辞検索を実行し、マッチごとにコールバックを呼び出します。
    ///
    /// # 引数
    ///
    /// * `input` - 検索対象の文字列(正規化済みテキストの接尾辞)
    /// * `f` - マッチごとに呼び出されるコールバック
    #[inline(always)]
    pub fn common_prefix_scan<F>(&self, input: &str, f: F)
    where
        F: FnMut(TrieMatch),
    {
        scan(&self.data, input, f);
    }
}

/// トライマッチング結果
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct TrieMatch {
    pub value: u32,
    pub end_char: usize,
}

impl TrieMatch {
    /// 新しいマッチング結果を作成します。
    #[inline(always)]
    pub const fn new(value: u32, end_char: usize) -> Self {
        Self { value, end_char }
    }
}

impl ArchivedTrie {
    /// 共通接頭辞検索を実行します（アーカイブ版）。
    #[inline(always)]
    pub fn common_prefix_scan<F>(&self, input: &str, f: F)
    where
        F: FnMut(TrieMatch),
    {
        scan(self.data.as_slice(), input, f);
    }
}

/// ダブル配列バイト列に対する共通接頭辞検索の本体
///
/// ダブル配列の報告するバイト長を、前回マッチからの差分だけ文字を数える
/// ことで文字長へ逐次変換します。マッチ長は単調増加するため、変換の総コスト
/// はマッチした長さに比例します。
#[inline(always)]
fn scan<F>(data: &[u8], input: &str, mut f: F)
where
    F: FnMut(TrieMatch),
{
    let da = DoubleArray::new(data);
    let mut prev_byte = 0;
    let mut end_char = 0;
    for (value, end_byte) in da.common_prefix_search(input.as_bytes()) {
        end_char += input[prev_byte..end_byte].chars().count();
        prev_byte = end_byte;
        f(TrieMatch::new(value, end_char));
    }
}
