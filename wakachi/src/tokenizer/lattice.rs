//! ビタビ探索のためのラティス
//!
//! このモジュールは、文の各文字位置を頂点とするラティスを構築し、
//! 接続コストと単語コストの総和が最小となる経路を前向き計算で求めます。
//! ノードは終端位置でインデックス化され、各ノードは自身までの最小コストと
//! 最小コスト経路上の直前ノードを記録します。

use crate::common::{BOS_EOS_CONNECTION_ID, MAX_SENTENCE_LENGTH};
use crate::dictionary::connector::ConnectorCost;
use crate::dictionary::{LexType, WordIdx, WordParam};
use crate::errors::{Result, WakachiError};

const MAX_COST: i32 = i32::MAX;
const INVALID_IDX: u16 = u16::MAX;

/// ラティスのノード
///
/// 1つの単語候補(または仮想的なBOS/EOS)に対応します。
/// `min_cost`はBOSからこのノードまでの最小経路コスト、`min_idx`は
/// その経路上の直前ノードの`ends[start_word]`内での位置です。
#[derive(Clone, Copy, Debug)]
pub struct Node {
    word_id: u32,
    lex_type: LexType,
    start_word: usize,
    left_id: u16,
    right_id: u16,
    min_idx: u16,
    min_cost: i32,
}

impl Node {
    /// 単語インデックスを返します。
    #[inline(always)]
    pub(crate) const fn word_idx(&self) -> WordIdx {
        WordIdx::new(self.lex_type, self.word_id)
    }

    /// 開始文字位置を返します。
    #[inline(always)]
    pub(crate) const fn start_word(&self) -> usize {
        self.start_word
    }

    /// BOSからこのノードまでの最小経路コストを返します。
    #[inline(always)]
    pub(crate) const fn min_cost(&self) -> i32 {
        self.min_cost
    }
}

/// ビタビ探索のためのラティス
///
/// `ends[i]`は文字位置`i`で終わるノードの列です。挿入時に直前ノードの
/// 最小コストを確定させる前向き計算を行うため、ノードは開始位置の昇順に
/// 挿入される必要があります。
#[derive(Default)]
pub struct Lattice {
    ends: Vec<Vec<Node>>,
    eos: Option<Node>,
    len_char: usize,
}

impl Lattice {
    /// ラティスを指定の文長で初期化し、BOSノードを挿入します。
    ///
    /// 確保済みの行バッファは再利用されます。
    pub fn reset(&mut self, new_len: usize) {
        Self::reset_vec(&mut self.ends, new_len + 1);
        self.len_char = new_len;
        self.eos = None;
        self.insert_bos();
    }

    fn reset_vec<T>(data: &mut Vec<Vec<T>>, new_len: usize) {
        for v in data.iter_mut() {
            v.clear();
        }
        let cur_len = data.len();
        if cur_len <= new_len {
            data.reserve(new_len - cur_len);
            for _ in cur_len..new_len {
                data.push(Vec::with_capacity(16))
            }
        }
    }

    fn insert_bos(&mut self) {
        self.ends[0].push(Node {
            word_id: u32::MAX,
            lex_type: LexType::System,
            start_word: MAX_SENTENCE_LENGTH,
            left_id: u16::MAX,
            right_id: BOS_EOS_CONNECTION_ID,
            min_idx: INVALID_IDX,
            min_cost: 0,
        });
    }

    /// EOSノードを挿入し、文末までの最小経路コストを確定します。
    ///
    /// # 引数
    ///
    /// * `connector` - 接続コスト計算器
    pub fn insert_eos<C>(&mut self, connector: &C)
    where
        C: ConnectorCost,
    {
        let (min_idx, min_cost) =
            self.search_min_node(self.len_char, BOS_EOS_CONNECTION_ID, connector);
        self.eos = Some(Node {
            word_id: u32::MAX,
            lex_type: LexType::System,
            start_word: self.len_char,
            left_id: BOS_EOS_CONNECTION_ID,
            right_id: u16::MAX,
            min_idx,
            min_cost,
        });
    }

    /// 単語候補のノードを挿入します。
    ///
    /// 開始位置で終わるノードのうち接続コストとの和が最小のものを直前
    /// ノードとして記録します。開始位置に到達可能なノードが1つもない
    /// 場合、この候補はどの経路にも乗れないため挿入されません。
    ///
    /// # 引数
    ///
    /// * `start_word` - 開始文字位置
    /// * `end_word` - 終了文字位置
    /// * `word_idx` - 単語インデックス
    /// * `word_param` - 単語パラメータ
    /// * `connector` - 接続コスト計算器
    pub fn insert_node<C>(
        &mut self,
        start_word: usize,
        end_word: usize,
        word_idx: WordIdx,
        word_param: WordParam,
        connector: &C,
    ) where
        C: ConnectorCost,
    {
        debug_assert!(start_word < end_word);
        debug_assert!(end_word <= self.len_char);

        let (min_idx, min_cost) =
            self.search_min_node(start_word, word_param.left_id, connector);
        if min_idx == INVALID_IDX {
            return;
        }

        self.ends[end_word].push(Node {
            word_id: word_idx.word_id,
            lex_type: word_idx.lex_type,
            start_word,
            left_id: word_param.left_id,
            right_id: word_param.right_id,
            min_idx,
            min_cost: min_cost.saturating_add(i32::from(word_param.word_cost)),
        });
    }

    fn search_min_node<C>(&self, start_word: usize, left_id: u16, connector: &C) -> (u16, i32)
    where
        C: ConnectorCost,
    {
        let mut min_idx = INVALID_IDX;
        let mut min_cost = MAX_COST;
        let mut min_start = usize::MAX;
        for (i, left_node) in self.ends[start_word].iter().enumerate() {
            let connect_cost = connector.cost(left_node.right_id, left_id);
            let new_cost = left_node.min_cost.saturating_add(connect_cost);
            // Equal costs resolve to the longer left node, so that tied
            // paths produce fewer morphemes.
            if new_cost < min_cost || (new_cost == min_cost && left_node.start_word < min_start) {
                min_idx = u16::try_from(i).unwrap();
                min_cost = new_cost;
                min_start = left_node.start_word;
            }
        }
        (min_idx, min_cost)
    }

    /// 指定位置で終わるノードが存在するかを返します。
    #[inline(always)]
    pub fn has_previous_node(&self, i: usize) -> bool {
        !self.ends[i].is_empty()
    }

    /// 最小コスト経路上のノードを終端から遡って追加します。
    ///
    /// ノードは文末から文頭の順で`top_nodes`に追加されます。各要素は
    /// `(終了文字位置, ノード)`の組です。
    ///
    /// # エラー
    ///
    /// EOSに到達する経路が存在しない場合、
    /// [`WakachiError::PathResolutionFailed`]を返します。ラティスが
    /// 正しく構築されていればこのエラーは発生しません。
    pub fn append_top_nodes(&self, top_nodes: &mut Vec<(usize, Node)>) -> Result<()> {
        let Some(eos) = self.eos.as_ref() else {
            log::error!("lattice has no EOS node");
            return Err(WakachiError::path_resolution_failed(
                "the lattice is missing its terminal node",
            ));
        };

        let mut end_node = eos.start_word;
        let mut min_idx = eos.min_idx;
        while end_node != 0 {
            if min_idx == INVALID_IDX {
                log::error!("no lattice path reaches the terminal at position {end_node}");
                return Err(WakachiError::path_resolution_failed(format!(
                    "no lattice path reaches the terminal at position {end_node}"
                )));
            }
            let Some(node) = self
                .ends
                .get(end_node)
                .and_then(|row| row.get(usize::from(min_idx)))
            else {
                log::error!("lattice backtrack left the node table at position {end_node}");
                return Err(WakachiError::path_resolution_failed(format!(
                    "lattice backtrack left the node table at position {end_node}"
                )));
            };
            top_nodes.push((end_node, *node));
            end_node = node.start_word;
            min_idx = node.min_idx;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::dictionary::connector::MatrixConnector;

    fn zero_connector() -> MatrixConnector {
        MatrixConnector::from_reader("1 1\n0 0 0".as_bytes()).unwrap()
    }

    #[test]
    fn test_min_cost_path() {
        let conn = zero_connector();
        let mut lattice = Lattice::default();
        lattice.reset(2);
        // The pricier single word loses against two cheap words.
        lattice.insert_node(0, 2, WordIdx::new(LexType::System, 0), WordParam::new(0, 0, 30), &conn);
        lattice.insert_node(0, 1, WordIdx::new(LexType::System, 1), WordParam::new(0, 0, 10), &conn);
        lattice.insert_node(1, 2, WordIdx::new(LexType::System, 2), WordParam::new(0, 0, 10), &conn);
        lattice.insert_eos(&conn);

        let mut top_nodes = vec![];
        lattice.append_top_nodes(&mut top_nodes).unwrap();

        assert_eq!(top_nodes.len(), 2);
        // Nodes are appended backwards.
        assert_eq!(top_nodes[0].1.word_idx().word_id, 2);
        assert_eq!(top_nodes[1].1.word_idx().word_id, 1);
        assert_eq!(top_nodes[0].1.min_cost(), 20);
    }

    #[test]
    fn test_tie_prefers_longer_node() {
        let conn = zero_connector();
        let mut lattice = Lattice::default();
        lattice.reset(2);
        // Both paths cost 20; the single longer word must win even though
        // the one-char path was inserted afterwards.
        lattice.insert_node(0, 2, WordIdx::new(LexType::System, 0), WordParam::new(0, 0, 20), &conn);
        lattice.insert_node(0, 1, WordIdx::new(LexType::System, 1), WordParam::new(0, 0, 10), &conn);
        lattice.insert_node(1, 2, WordIdx::new(LexType::System, 2), WordParam::new(0, 0, 10), &conn);
        lattice.insert_eos(&conn);

        let mut top_nodes = vec![];
        lattice.append_top_nodes(&mut top_nodes).unwrap();

        assert_eq!(top_nodes.len(), 1);
        assert_eq!(top_nodes[0].1.word_idx().word_id, 0);
        assert_eq!(top_nodes[0].1.min_cost(), 20);
    }

    #[test]
    fn test_unconnected_node_is_dropped() {
        let conn = zero_connector();
        let mut lattice = Lattice::default();
        lattice.reset(2);
        // Nothing ends at position 1, so this node can never be reached.
        lattice.insert_node(1, 2, WordIdx::new(LexType::System, 0), WordParam::new(0, 0, 10), &conn);
        assert!(!lattice.has_previous_node(2));
    }

    #[test]
    fn test_unreachable_terminal() {
        let conn = zero_connector();
        let mut lattice = Lattice::default();
        lattice.reset(2);
        lattice.insert_eos(&conn);

        let mut top_nodes = vec![];
        let e = lattice.append_top_nodes(&mut top_nodes).unwrap_err();
        assert!(matches!(e, WakachiError::PathResolutionFailed(_)));
    }
}
