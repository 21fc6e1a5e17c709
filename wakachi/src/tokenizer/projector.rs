//! 最小コスト経路から分割単位へのトークン射影
//!
//! このモジュールは、ビタビ探索で得た最小コスト経路上のノード列を、
//! 指定された分割単位([`Mode`])のトークン区間列へ射影します。
//! 経路そのものは分割単位に依存せず、射影のみがモードで変化します。
//!
//! - 中単位: 経路上のノードをそのままトークンとします。
//! - 短単位: 短単位への分割を宣言した中単位ノードを構成要素へ展開します。
//! - 長単位: 複合語索引に一致するノード列を貪欲に結合します。
//!
//! 未知語ノードはどのモードでも分割も結合もされません。

use crate::dictionary::{DictionaryInnerRef, LexType, WordIdx};
use crate::mode::Mode;
use crate::tokenizer::lattice::Node;

/// 1トークン分の区間
///
/// 文字位置は正規化文字列上の位置です。`total_cost`は経路上でこの区間の
/// 終端に到達した時点の累積コストです。
#[derive(Clone, Copy, Debug)]
pub struct TokenSpan {
    pub word_idx: WordIdx,
    pub start_char: usize,
    pub end_char: usize,
    pub total_cost: i32,
}

macro_rules! project_logic {
    ($self:ident, $dict:ident, $top_nodes:ident, $mode:ident, $spans:ident) => {
        match $mode {
            Mode::Medium => {
                Self::append_medium($top_nodes, $spans);
            }
            Mode::Short => {
                for (end_char, node) in $top_nodes.iter().rev() {
                    let word_idx = node.word_idx();
                    if word_idx.lex_type != LexType::Unknown {
                        let info = $dict.word_info(word_idx);
                        if info.num_splits() != 0 {
                            let mut cursor = node.start_word();
                            for i in 0..info.num_splits() {
                                let sub_idx = WordIdx::new(word_idx.lex_type, info.split(i));
                                let sub_len = $dict.word_info(sub_idx).surface.chars().count();
                                $spans.push(TokenSpan {
                                    word_idx: sub_idx,
                                    start_char: cursor,
                                    end_char: cursor + sub_len,
                                    total_cost: node.min_cost(),
                                });
                                cursor += sub_len;
                            }
                            // Split surfaces tile the parent surface; the
                            // builder rejects rows where they do not.
                            debug_assert_eq!(cursor, *end_char);
                            continue;
                        }
                    }
                    $spans.push(TokenSpan {
                        word_idx,
                        start_char: node.start_word(),
                        end_char: *end_char,
                        total_cost: node.min_cost(),
                    });
                }
            }
            Mode::Long => {
                $self.scratch.clear();
                Self::append_medium($top_nodes, &mut $self.scratch);

                let mut i = 0;
                while i < $self.scratch.len() {
                    let span = $self.scratch[i];
                    let mut best: Option<(WordIdx, usize)> = None;
                    if span.word_idx.lex_type != LexType::Unknown {
                        $dict.compound_candidates_to(span.word_idx, &mut $self.candidates);
                        for &cand in &$self.candidates {
                            let cand_idx = WordIdx::new(span.word_idx.lex_type, cand);
                            let cand_info = $dict.word_info(cand_idx);
                            let num_constituents = cand_info.num_splits();
                            if num_constituents > $self.scratch.len() - i {
                                continue;
                            }
                            if let Some((_, best_len)) = best {
                                if num_constituents <= best_len {
                                    continue;
                                }
                            }
                            let mut all_match = true;
                            for j in 0..num_constituents {
                                let m = &$self.scratch[i + j];
                                if m.word_idx.lex_type != span.word_idx.lex_type
                                    || m.word_idx.word_id != cand_info.split(j)
                                {
                                    all_match = false;
                                    break;
                                }
                            }
                            if all_match {
                                best = Some((cand_idx, num_constituents));
                            }
                        }
                    }
                    match best {
                        Some((cand_idx, num_constituents)) => {
                            let last = &$self.scratch[i + num_constituents - 1];
                            $spans.push(TokenSpan {
                                word_idx: cand_idx,
                                start_char: span.start_char,
                                end_char: last.end_char,
                                total_cost: last.total_cost,
                            });
                            i += num_constituents;
                        }
                        None => {
                            $spans.push(span);
                            i += 1;
                        }
                    }
                }
            }
        }
    };
}

/// 経路ノード列をトークン区間列へ射影する変換器
///
/// 長単位の結合に使う作業バッファを保持し、解析のたびに再利用します。
#[derive(Default)]
pub struct Projector {
    candidates: Vec<u32>,
    scratch: Vec<TokenSpan>,
}

impl Projector {
    /// 経路ノード列を指定モードのトークン区間列へ射影します。
    ///
    /// `top_nodes`は[`Lattice::append_top_nodes`]の出力(文末から文頭の
    /// 順)をそのまま受け取り、`spans`には文頭からの順でトークン区間を
    /// 書き出します。
    ///
    /// [`Lattice::append_top_nodes`]: crate::tokenizer::lattice::Lattice::append_top_nodes
    ///
    /// # 引数
    ///
    /// * `dict` - 辞書への参照
    /// * `top_nodes` - 最小コスト経路上のノード列(逆順)
    /// * `mode` - 分割単位
    /// * `spans` - トークン区間の出力バッファ
    pub fn project(
        &mut self,
        dict: DictionaryInnerRef,
        top_nodes: &[(usize, Node)],
        mode: Mode,
        spans: &mut Vec<TokenSpan>,
    ) {
        spans.clear();
        match dict {
            DictionaryInnerRef::Archived(d) => {
                project_logic!(self, d, top_nodes, mode, spans)
            }
            DictionaryInnerRef::Owned(d) => {
                project_logic!(self, d, top_nodes, mode, spans)
            }
        }
    }

    fn append_medium(top_nodes: &[(usize, Node)], spans: &mut Vec<TokenSpan>) {
        for (end_char, node) in top_nodes.iter().rev() {
            spans.push(TokenSpan {
                word_idx: node.word_idx(),
                start_char: node.start_word(),
                end_char: *end_char,
                total_cost: node.min_cost(),
            });
        }
    }
}
