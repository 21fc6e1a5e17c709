//! 単語の語彙情報
//!
//! このモジュールは、単語に関連付けられた語彙情報(品詞、読み、正規化形、
//! 辞書形、分割単位)を管理します。品詞パスは語彙内で共有されるため、
//! 品詞テーブルにインターンされ、各単語はそのIDのみを保持します。

use rkyv::{Archive, Deserialize, Serialize};

/// 辞書エントリの分割単位階層
///
/// 各エントリはちょうど1つの階層に属します。短単位(A)は原子的な形態素、
/// 中単位(B)は短単位への分割を宣言でき、長単位(C)は中単位の構成列を
/// 宣言する複合語です。ラティスにはAとBのエントリのみが現れ、Cは
/// 長単位モードの結合対象としてのみ参照されます。
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Archive, Serialize, Deserialize)]
#[rkyv(compare(PartialEq), derive(Clone, Copy, Debug))]
#[repr(u8)]
pub enum Tier {
    /// 短単位(A)
    Short,

    /// 中単位(B)
    #[default]
    Medium,

    /// 長単位(C)
    Long,
}

impl Tier {
    /// 辞書CSVの階層フィールド(`A`/`B`/`C`)から階層を引きます。
    ///
    /// # 引数
    ///
    /// * `symbol` - 階層フィールドの文字列
    ///
    /// # 戻り値
    ///
    /// 対応する階層。未定義の表記の場合は`None`
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "A" => Some(Self::Short),
            "B" => Some(Self::Medium),
            "C" => Some(Self::Long),
            _ => None,
        }
    }
}

impl ArchivedTier {
    /// ネイティブ形式に変換します。
    pub fn to_native(self) -> Tier {
        match self {
            Self::Short => Tier::Short,
            Self::Medium => Tier::Medium,
            Self::Long => Tier::Long,
        }
    }
}

/// 1単語分の語彙情報
///
/// 品詞はインターン済みIDで保持し、表層形・読み・正規化形・辞書形は
/// 構築時に解決済みの文字列として保持します。`splits`はB行では短単位の
/// 構成行、C行では中単位の構成行への単語ID列です(A行では常に空)。
#[derive(Debug, Clone, Archive, Serialize, Deserialize)]
pub struct WordInfo {
    pub surface: String,
    pub pos_id: u16,
    pub tier: Tier,
    pub reading: String,
    pub normalized: String,
    pub dict_form: String,
    pub splits: Vec<u32>,
}

/// 単語の語彙情報を管理する構造体
#[derive(Default, Archive, Serialize, Deserialize)]
pub struct WordInfos {
    pos_table: Vec<String>,
    infos: Vec<WordInfo>,
}

impl WordInfos {
    /// 品詞テーブルと語彙情報のリストから新しいインスタンスを作成します。
    pub fn new<I>(pos_table: Vec<String>, infos: I) -> Self
    where
        I: IntoIterator<Item = WordInfo>,
    {
        Self {
            pos_table,
            infos: infos.into_iter().collect(),
        }
    }

    /// 単語IDから語彙情報を取得します。
    #[inline(always)]
    pub fn get(&self, word_id: usize) -> &WordInfo {
        &self.infos[word_id]
    }

    /// 品詞IDから品詞パス文字列を取得します。
    #[inline(always)]
    pub fn pos(&self, pos_id: u16) -> &str {
        &self.pos_table[usize::from(pos_id)]
    }

    /// 単語IDの品詞パス文字列を取得します。
    #[inline(always)]
    pub fn word_pos(&self, word_id: usize) -> &str {
        self.pos(self.infos[word_id].pos_id)
    }
}

impl ArchivedWordInfos {
    /// 単語IDから語彙情報を取得します（アーカイブ版）。
    #[inline(always)]
    pub fn get(&self, word_id: usize) -> &ArchivedWordInfo {
        &self.infos[word_id]
    }

    /// 品詞IDから品詞パス文字列を取得します（アーカイブ版）。
    #[inline(always)]
    pub fn pos(&self, pos_id: u16) -> &str {
        &self.pos_table[usize::from(pos_id)]
    }

    /// 単語IDの品詞パス文字列を取得します（アーカイブ版）。
    #[inline(always)]
    pub fn word_pos(&self, word_id: usize) -> &str {
        self.pos(self.infos[word_id].pos_id.to_native())
    }
}

impl ArchivedWordInfo {
    /// 分割単位の単語ID列をバッファへ書き出します。
    #[inline(always)]
    pub fn splits_to(&self, out: &mut Vec<u32>) {
        out.clear();
        out.extend(self.splits.iter().map(|x| x.to_native()));
    }

    /// 分割単位の数を返します。
    #[inline(always)]
    pub fn num_splits(&self) -> usize {
        self.splits.len()
    }

    /// 指定位置の分割単位の単語IDを返します。
    #[inline(always)]
    pub fn split(&self, i: usize) -> u32 {
        self.splits[i].to_native()
    }
}

impl WordInfo {
    /// 分割単位の単語ID列をバッファへ書き出します。
    #[inline(always)]
    pub fn splits_to(&self, out: &mut Vec<u32>) {
        out.clear();
        out.extend_from_slice(&self.splits);
    }

    /// 分割単位の数を返します。
    #[inline(always)]
    pub fn num_splits(&self) -> usize {
        self.splits.len()
    }

    /// 指定位置の分割単位の単語IDを返します。
    #[inline(always)]
    pub fn split(&self, i: usize) -> u32 {
        self.splits[i]
    }
}

/// 品詞パスをインターンして品詞IDを割り当てるビルダー
///
/// 辞書構築時に使用され、同一の品詞パスへ同一のIDを割り当てます。
#[derive(Default)]
pub struct PosTableBuilder {
    table: Vec<String>,
    index: hashbrown::HashMap<String, u16>,
}

impl PosTableBuilder {
    /// 新しいビルダーを作成します。
    pub fn new() -> Self {
        Self::default()
    }

    /// 品詞パスをインターンし、割り当てられたIDを返します。
    ///
    /// # 引数
    ///
    /// * `pos` - カンマ区切りの品詞パス(例: `"名詞,固有名詞,地名,一般"`)
    ///
    /// # 戻り値
    ///
    /// 品詞ID。テーブルが65536種を超えた場合は`None`
    pub fn intern(&mut self, pos: &str) -> Option<u16> {
        if let Some(&id) = self.index.get(pos) {
            return Some(id);
        }
        let id = u16::try_from(self.table.len()).ok()?;
        self.table.push(pos.to_string());
        self.index.insert(pos.to_string(), id);
        Some(id)
    }

    /// インターン済みの品詞テーブルを返します。
    #[allow(clippy::missing_const_for_fn)]
    pub fn build(self) -> Vec<String> {
        self.table
    }

    /// インターン済みの品詞数を返します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.table.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::hashmap;

    #[test]
    fn test_intern_dedups() {
        let mut b = PosTableBuilder::new();
        let id0 = b.intern("名詞,普通名詞,一般,*").unwrap();
        let id1 = b.intern("動詞,一般,*,*").unwrap();
        let id2 = b.intern("名詞,普通名詞,一般,*").unwrap();
        assert_eq!(id0, id2);
        assert_ne!(id0, id1);

        let expected = hashmap!["名詞,普通名詞,一般,*" => 0u16, "動詞,一般,*,*" => 1u16];
        let table = b.build();
        for (pos, id) in expected {
            assert_eq!(table[usize::from(id)], pos);
        }
    }

    #[test]
    fn test_tier_symbols() {
        assert_eq!(Tier::from_symbol("A"), Some(Tier::Short));
        assert_eq!(Tier::from_symbol("B"), Some(Tier::Medium));
        assert_eq!(Tier::from_symbol("C"), Some(Tier::Long));
        assert_eq!(Tier::from_symbol("D"), None);
    }

    #[test]
    fn test_word_pos() {
        let infos = WordInfos::new(
            vec!["名詞,普通名詞,一般,*".to_string()],
            vec![WordInfo {
                surface: "今日".to_string(),
                pos_id: 0,
                tier: Tier::Short,
                reading: "キョウ".to_string(),
                normalized: "今日".to_string(),
                dict_form: "今日".to_string(),
                splits: vec![],
            }],
        );
        assert_eq!(infos.word_pos(0), "名詞,普通名詞,一般,*");
        assert_eq!(infos.get(0).reading, "キョウ");
    }
}
