//! トークン化のための辞書モジュール。
//!
//! このモジュールは、形態素解析に必要な辞書データの読み込み、構築、管理を行います。
//! 主な機能として以下を提供します:
//!
//! - システム辞書とユーザー辞書の読み込み
//! - ゼロコピーデシリアライゼーションによる高速な辞書アクセス
//! - メモリマップドファイルによる効率的なメモリ使用
//! - Zstandard圧縮辞書の透過的な展開とキャッシング
//!
//! # 辞書の読み込み方法
//!
//! 辞書は複数の方法で読み込むことができます:
//!
//! - [`Dictionary::from_path`]: ファイルパスから辞書を読み込む(推奨)
//! - [`Dictionary::read`]: リーダーから辞書を読み込む
//! - [`Dictionary::from_zstd`]: Zstandard圧縮辞書を読み込む
//!
//! # 辞書のビルド
//!
//! [`SystemDictionaryBuilder`]を使用して、CSV形式のソースデータから辞書を構築できます。
pub mod builder;
pub(crate) mod character;
pub(crate) mod connector;
pub(crate) mod lexicon;
pub(crate) mod unknown;
pub(crate) mod word_idx;

use std::fs::{self, File, Metadata, create_dir_all};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::ops::Deref;

use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use memmap2::Mmap;
use rkyv::{Archived, access_unchecked};
use rkyv::rancor::Error;
use rkyv::util::AlignedVec;
use rkyv::{
    access, api::serialize_using, ser::allocator::Arena, ser::sharing::Share,
    ser::writer::IoWriter, ser::Serializer, util::with_arena, Archive, Deserialize,
    Serialize,
};
use sha2::{Digest, Sha256};

use crate::dictionary::connector::{ArchivedMatrixConnector, MatrixConnector};
use crate::dictionary::lexicon::{ArchivedLexicon, ArchivedWordInfo, Lexicon, WordInfo};
use crate::dictionary::unknown::{ArchivedUnkHandler, UnkHandler};
use crate::errors::{Result, WakachiError};

pub use crate::dictionary::builder::SystemDictionaryBuilder;
pub use crate::dictionary::word_idx::WordIdx;

pub(crate) use crate::dictionary::lexicon::WordParam;

/// Wakachiの辞書ファイルを識別するマジックバイト。
///
/// この定数の"0.1"はディスク上のモデルフォーマットのバージョンを示しており、
/// クレートのセマンティックバージョンからは切り離されています。フォーマットに
/// 非互換な変更が入った場合にのみ更新されます。
pub const MODEL_MAGIC: &[u8] = b"WakachiDictRkyv 0.1\n";

const MODEL_MAGIC_LEN: usize = MODEL_MAGIC.len();
const RKYV_ALIGNMENT: usize = 16;
const PADDING_LEN: usize = (RKYV_ALIGNMENT - (MODEL_MAGIC_LEN % RKYV_ALIGNMENT)) % RKYV_ALIGNMENT;
const DATA_START: usize = MODEL_MAGIC_LEN + PADDING_LEN;

/// グローバルキャッシュディレクトリのパス。
///
/// ユーザー固有のシステムキャッシュディレクトリ内の`wakachi`サブディレクトリを指します。
/// 各プラットフォームでの標準的なキャッシュディレクトリ:
/// - Linux: `$XDG_CACHE_HOME/wakachi` または `$HOME/.cache/wakachi`
/// - macOS: `$HOME/Library/Caches/wakachi`
/// - Windows: `{FOLDERID_LocalAppData}/wakachi`
pub static GLOBAL_CACHE_DIR: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    let path = dirs::cache_dir()?.join("wakachi");
    fs::create_dir_all(&path).ok()?;

    Some(path)
});

/// グローバルデータディレクトリのパス。
///
/// ユーザー固有のローカルデータディレクトリ内の`wakachi`サブディレクトリを指します。
/// 各プラットフォームでの標準的なデータディレクトリ:
/// - Linux: `$XDG_DATA_HOME/wakachi` または `$HOME/.local/share/wakachi`
/// - macOS: `$HOME/Library/Application Support/wakachi`
/// - Windows: `{FOLDERID_LocalAppData}/wakachi`
pub static GLOBAL_DATA_DIR: LazyLock<Option<PathBuf>> = LazyLock::new(|| {
    let path = dirs::data_local_dir()?.join("wakachi");
    fs::create_dir_all(&path).ok()?;

    Some(path)
});

/// 辞書の読み込みモード。
///
/// 辞書ファイルを読み込む際の検証戦略を指定します。
/// 安全性とパフォーマンスのトレードオフを制御できます。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum LoadMode {
    /// 読み込むたびに完全な検証を実行します(最も安全)。
    ///
    /// このモードでは、辞書データの整合性を毎回検証するため、
    /// 最も安全ですがパフォーマンスは低下します。
    /// キャッシュファイルは作成されません。
    Validate,
    /// 事前計算されたハッシュが一致する場合は検証をスキップします(繰り返しの読み込みで最速)。
    ///
    /// このモードでは、ファイルメタデータに基づくハッシュを使用して、
    /// 検証済みであることを確認します。高速な読み込みが可能ですが、
    /// ファイルが置き換えられるTOCTOU攻撃に対して脆弱です。
    TrustCache,
}

/// Zstandardアーカイブから展開された辞書のキャッシング戦略を指定します。
///
/// 辞書ファイルが圧縮されている場合、展開後のデータをどこにキャッシュするかを制御します。
pub enum CacheStrategy {
    /// 圧縮辞書と同じディレクトリに`.cache`サブディレクトリを作成します。
    ///
    /// この戦略は、キャッシュデータを元のファイルと並べて保持します。
    /// 親ディレクトリが書き込み可能でない場合は失敗します。
    Local,

    /// オペレーティングシステムに適した、共有のユーザー固有キャッシュディレクトリを使用します。
    ///
    /// ほとんどのアプリケーションに適したデフォルトの選択肢です。
    /// 特に辞書ファイルが読み取り専用の場所に保存されている場合に有用です。
    /// パスは`dirs::cache_dir()`によって決定されます。
    ///
    /// | プラットフォーム | 値                             | 例                               |
    /// | -------- | --------------------------------- | ------------------------------------- |
    /// | Linux    | `$XDG_CACHE_HOME` または `$HOME/.cache` | `/home/alice/.cache`                  |
    /// | macOS    | `$HOME/Library/Caches`            | `/Users/Alice/Library/Caches`         |
    /// | Windows  | `{FOLDERID_LocalAppData}`         | `C:\Users\Alice\AppData\Local`        |
    ///
    GlobalCache,

    /// オペレーティングシステムに適した、共有のユーザー固有データディレクトリを使用します。
    ///
    /// `GlobalCache`に似ていますが、永続的で非ローミングのアプリケーションデータ用の
    /// ディレクトリを使用します。パスは`dirs::data_local_dir()`によって決定されます。
    ///
    /// | プラットフォーム | 値                                     | 例                               |
    /// | -------- | ----------------------------------------- | ------------------------------------- |
    /// | Linux    | `$XDG_DATA_HOME` または `$HOME/.local/share`  | `/home/alice/.local/share`            |
    /// | macOS    | `$HOME/Library/Application Support`       | `/Users/Alice/Library/Application Support` |
    /// | Windows  | `{FOLDERID_LocalAppData}`                 | `C:\Users\Alice\AppData\Local`        |
    ///
    GlobalData,
}

/// [`Dictionary`]の内部データ。
///
/// 辞書の実際のデータを保持する構造体です。
/// システム辞書、ユーザー辞書、接続コスト行列、未知語ハンドラの
/// すべての必要なコンポーネントを含みます。
#[derive(Archive, Serialize, Deserialize)]
pub struct DictionaryInner {
    system_lexicon: Lexicon,
    user_lexicon: Option<Lexicon>,
    connector: MatrixConnector,
    unk_handler: UnkHandler,
}

/// メモリバッファ(mmapまたはヒープ)を所有し、アーカイブされた辞書へのアクセスを提供するラッパー。
///
/// この列挙型は、辞書データを保持するための2つの異なるメモリ戦略を表します:
/// - `Mmap`: メモリマップドファイルによるゼロコピーアクセス
/// - `Aligned`: ヒープ上のアライメント済みバッファ
#[allow(dead_code)]
enum DictBuffer {
    Mmap(Mmap),
    Aligned(AlignedVec<16>),
}

/// トークン化のための読み取り専用辞書。
///
/// 2つのバリアントがあります:
/// - `Archived`: メモリマップまたはアライメント済みバッファから直接アクセスされる辞書
/// - `Owned`: ヒープ上に所有される辞書データ([`SystemDictionaryBuilder`]の出力など)
///
/// どちらのバリアントも読み込み後は不変であり、複数スレッドから
/// ロックなしで同時に参照できます。
pub enum Dictionary {
    Archived(ArchivedDictionary),
    Owned { dict: Arc<DictionaryInner> },
}

/// アーカイブ形式の辞書。
///
/// メモリバッファとアーカイブされた辞書データへの参照を保持します。
/// ゼロコピーアクセスを可能にし、高速な辞書参照を実現します。
pub struct ArchivedDictionary {
    _buffer: DictBuffer,
    data: &'static ArchivedDictionaryInner,
}

/// 辞書内部データへの参照(アーカイブ版または所有版)。
///
/// 辞書の実装の詳細を隠蔽し、アーカイブ版と所有版の両方に対して
/// 統一的なインターフェースを提供します。
pub(crate) enum DictionaryInnerRef<'a> {
    Archived(&'a ArchivedDictionaryInner),
    Owned(&'a DictionaryInner),
}

impl Deref for ArchivedDictionary {
    type Target = ArchivedDictionaryInner;
    fn deref(&self) -> &Self::Target {
        self.data
    }
}

/// 単語を含む語彙辞書の種類。
///
/// 形態素解析時に使用される辞書の種類を識別します。
/// システム辞書、ユーザー辞書、未知語の3種類があります。
#[derive(
    Clone, Copy, Eq, PartialEq, Debug, Hash,
    Archive, Serialize, Deserialize,
)]
#[rkyv(
    compare(PartialEq),
    derive(Debug, Eq, PartialEq, Hash, Clone, Copy),
)]
#[repr(u8)]
#[derive(Default)]
pub enum LexType {
    /// システム辞書。
    ///
    /// 基本的な語彙を含むメインの辞書です。
    #[default]
    System,
    /// ユーザー辞書。
    ///
    /// ユーザーが定義した追加の語彙を含む辞書です。
    User,
    /// 未知語。
    ///
    /// システム辞書にもユーザー辞書にも見つからない単語です。
    Unknown,
}

impl ArchivedLexType {
    /// この[`ArchivedLexType`]を対応する[`LexType`]に変換します。
    ///
    /// # 戻り値
    ///
    /// アーカイブされた列挙値に対応するネイティブの`LexType`値。
    pub fn to_native(&self) -> LexType {
        match self {
            ArchivedLexType::System => LexType::System,
            ArchivedLexType::User => LexType::User,
            ArchivedLexType::Unknown => LexType::Unknown,
        }
    }
}

impl DictionaryInner {
    /// システム辞書への参照を取得します。
    ///
    /// # 戻り値
    ///
    /// システム辞書(`Lexicon`)への参照。
    #[inline(always)]
    pub(crate) const fn system_lexicon(&self) -> &Lexicon {
        &self.system_lexicon
    }

    /// ユーザー辞書への参照を取得します。
    ///
    /// # 戻り値
    ///
    /// ユーザー辞書が存在する場合は`Some(&Lexicon)`、存在しない場合は`None`。
    #[inline(always)]
    pub(crate) const fn user_lexicon(&self) -> Option<&Lexicon> {
        self.user_lexicon.as_ref()
    }

    /// 未知語ハンドラへの参照を取得します。
    ///
    /// # 戻り値
    ///
    /// 未知語ハンドラ(`UnkHandler`)への参照。
    #[inline(always)]
    pub(crate) const fn unk_handler(&self) -> &UnkHandler {
        &self.unk_handler
    }

    /// コネクタへの参照を取得します。
    ///
    /// # 戻り値
    ///
    /// 接続コスト計算に使用される`MatrixConnector`への参照。
    pub(crate) fn connector(&self) -> &MatrixConnector {
        &self.connector
    }

    /// 指定された単語のパラメータを取得します。
    ///
    /// # 引数
    ///
    /// * `word_idx` - 単語のインデックス。辞書の種類と位置を含みます。
    ///
    /// # 戻り値
    ///
    /// 単語のパラメータ(`WordParam`)。左接続ID、右接続ID、単語コストを含みます。
    #[inline(always)]
    pub(crate) fn word_param(&self, word_idx: WordIdx) -> WordParam {
        match word_idx.lex_type {
            LexType::System => self.system_lexicon().word_param(word_idx),
            LexType::User => self.user_lexicon().unwrap().word_param(word_idx),
            LexType::Unknown => self.unk_handler().word_param(word_idx),
        }
    }

    /// 指定された単語の品詞パス文字列への参照を取得します。
    ///
    /// # 引数
    ///
    /// * `word_idx` - 単語のインデックス。辞書の種類と位置を含みます。
    ///
    /// # 戻り値
    ///
    /// 品詞パス文字列への参照。
    #[inline(always)]
    pub fn word_pos(&self, word_idx: WordIdx) -> &str {
        match word_idx.lex_type {
            LexType::System => self.system_lexicon().word_pos(word_idx),
            LexType::User => self.user_lexicon().unwrap().word_pos(word_idx),
            LexType::Unknown => self.unk_handler().word_pos(word_idx),
        }
    }

    /// 指定された登録語の語彙情報への参照を取得します。
    ///
    /// # 引数
    ///
    /// * `word_idx` - 単語のインデックス。辞書の種類と位置を含みます。
    ///
    /// # Panics
    ///
    /// 未知語の`WordIdx`を渡した場合はパニックします。未知語は語彙情報を持ちません。
    #[inline(always)]
    pub(crate) fn word_info(&self, word_idx: WordIdx) -> &WordInfo {
        match word_idx.lex_type {
            LexType::System => self.system_lexicon().word_info(word_idx),
            LexType::User => self.user_lexicon().unwrap().word_info(word_idx),
            LexType::Unknown => unreachable!(),
        }
    }

    /// 指定された単語を先頭構成要素とする複合語の候補をバッファへ書き出します。
    ///
    /// 未知語は複合語に参加しないため、未知語の`WordIdx`に対しては
    /// 空の候補列を書き出します。
    ///
    /// # 引数
    ///
    /// * `word_idx` - 先頭構成要素の単語インデックス。
    /// * `out` - 候補の単語ID列を書き出すバッファ。
    #[inline(always)]
    pub(crate) fn compound_candidates_to(&self, word_idx: WordIdx, out: &mut Vec<u32>) {
        match word_idx.lex_type {
            LexType::System => self
                .system_lexicon()
                .compound_candidates_to(word_idx.word_id, out),
            LexType::User => self
                .user_lexicon()
                .unwrap()
                .compound_candidates_to(word_idx.word_id, out),
            LexType::Unknown => out.clear(),
        }
    }

    /// 辞書データを`rkyv`フォーマットを使用してライターにシリアライズします。
    ///
    /// この関数の出力バイナリは、`Dictionary::from_path`などのWakachiの
    /// 読み込みメソッドが期待する形式です。
    ///
    /// # Examples
    ///
    /// この例では、メモリ内のCSVデータから辞書を構築し、
    /// シリアライズされたバイナリをファイルに書き込む方法を示します。
    ///
    /// ```no_run
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use std::fs::File;
    /// use std::io::Cursor;
    /// use wakachi::dictionary::SystemDictionaryBuilder;
    ///
    /// // ソースデータからビルダーを使用して辞書インスタンスを作成します。
    /// let dict = SystemDictionaryBuilder::from_readers(
    ///     Cursor::new("東京,0,0,500,名詞,固有名詞,地名,一般,トウキョウ,*,*,A,*\n"),
    ///     Cursor::new("1 1\n0 0 0\n"),
    ///     Cursor::new("DEFAULT,0,0,1000,補助記号,一般,*,*\n"),
    /// )?;
    ///
    /// // 辞書をファイルにシリアライズします。
    /// let mut file = File::create("system.dic")?;
    /// dict.write(&mut file)?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - 基礎となる`writer`への書き込みに失敗した場合(例: I/Oエラー)。
    /// - `rkyv`シリアライゼーションプロセスでエラーが発生した場合。
    pub fn write<W>(&self, mut wtr: W) -> Result<()>
    where
        W: Write,
    {
        wtr.write_all(MODEL_MAGIC)?;

        let padding_bytes = vec![0xFF; PADDING_LEN];
        wtr.write_all(&padding_bytes)?;

        with_arena(|arena: &mut Arena| {
            let writer = IoWriter::new(&mut wtr);
            let mut serializer = Serializer::new(writer, arena.acquire(), Share::new());
            serialize_using::<_, rkyv::rancor::Error>(self, &mut serializer)
        })
        .map_err(|e| {
            WakachiError::invalid_state("rkyv serialization failed".to_string(), e.to_string())
        })?;

        Ok(())
    }

    /// リーダーからユーザー辞書をリセットします。
    ///
    /// この関数は、辞書をシリアライズする前に呼び出す必要があります。
    /// ユーザー辞書を新しいデータで置き換えるか、削除します。
    ///
    /// # 引数
    ///
    /// * `user_lexicon_rdr` - ユーザー辞書データを含むリーダー。`None`の場合、ユーザー辞書が削除されます。
    ///
    /// # 戻り値
    ///
    /// 更新された`DictionaryInner`インスタンス。
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - ユーザー辞書の読み込みに失敗した場合。
    /// - ユーザー辞書に無効な接続IDが含まれている場合。
    pub fn reset_user_lexicon_from_reader<R>(mut self, user_lexicon_rdr: Option<R>) -> Result<Self>
    where
        R: Read,
    {
        if let Some(user_lexicon_rdr) = user_lexicon_rdr {
            let user_lexicon = Lexicon::from_reader(user_lexicon_rdr, LexType::User)?;
            if !user_lexicon.verify(&self.connector) {
                return Err(WakachiError::invalid_argument(
                    "user_lexicon_rdr",
                    "includes invalid connection ids.",
                ));
            }
            self.user_lexicon = Some(user_lexicon);
        } else {
            self.user_lexicon = None;
        }
        Ok(self)
    }
}

impl Dictionary {
    /// `DictionaryInner`から辞書を作成します。
    ///
    /// # 引数
    ///
    /// * `dict` - 辞書の内部データ。
    ///
    /// # 戻り値
    ///
    /// 新しい`Dictionary`インスタンス。
    pub fn from_inner(dict: DictionaryInner) -> Self {
        Self::Owned { dict: Arc::new(dict) }
    }

    /// 辞書データを`rkyv`フォーマットを使用してライターにシリアライズします。
    ///
    /// この関数の出力バイナリは、`Dictionary::from_path`などのWakachiの
    /// 読み込みメソッドが期待する形式です。
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - 基礎となる`writer`への書き込みに失敗した場合(例: I/Oエラー)。
    /// - `rkyv`シリアライゼーションプロセスでエラーが発生した場合。
    ///
    /// # Panics
    ///
    /// `Dictionary::Archived`バリアントでこのメソッドが呼び出された場合にパニックします。
    /// アーカイブされた辞書は元のバイト列をそのままコピーすれば複製できます。
    pub fn write<W>(&self, wtr: W) -> Result<()>
    where
        W: Write,
    {
        match self {
            Dictionary::Owned { dict } => dict.write(wtr),
            Dictionary::Archived(_) => unreachable!(),
        }
    }

    /// リーダーからユーザー辞書をリセットします。
    ///
    /// ユーザー辞書を新しいデータで置き換えるか、削除します。
    /// ユーザー辞書の接続IDはシステム辞書の接続コスト行列に対して検証されます。
    ///
    /// この操作は`Owned`バリアント(ビルダーで構築した辞書)に対してのみ
    /// 使用できます。メモリマップされた辞書にユーザー辞書を組み込むには、
    /// 辞書コンパイラで再構築してください。
    ///
    /// # 引数
    ///
    /// * `user_lexicon_rdr` - ユーザー辞書データを含むリーダー。`None`の場合、ユーザー辞書が削除されます。
    ///
    /// # 戻り値
    ///
    /// 更新された`Dictionary`インスタンス。
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - ユーザー辞書の読み込みに失敗した場合。
    /// - ユーザー辞書に無効な接続IDが含まれている場合。
    /// - 辞書が`Archived`バリアントである場合。
    /// - 辞書が他の場所から共有されている場合。
    pub fn reset_user_lexicon_from_reader<R>(self, user_lexicon_rdr: Option<R>) -> Result<Self>
    where
        R: Read,
    {
        match self {
            Self::Owned { dict } => {
                let inner = Arc::try_unwrap(dict).map_err(|_| {
                    WakachiError::invalid_state(
                        "the dictionary is shared and cannot be modified",
                        "",
                    )
                })?;
                Ok(Self::from_inner(
                    inner.reset_user_lexicon_from_reader(user_lexicon_rdr)?,
                ))
            }
            Self::Archived(_) => Err(WakachiError::invalid_argument(
                "self",
                "a memory-mapped dictionary cannot install a user lexicon; rebuild it with the dictionary compiler.",
            )),
        }
    }

    /// すべてのデータをヒープバッファに読み込むことで、リーダーから辞書を作成します。
    ///
    /// これは、ファイルパスが利用できない場合(例: メモリ内バッファからの読み込み)の
    /// フォールバックです。すべてのコンテンツをメモリに読み込むため、
    /// `from_path`よりもメモリ効率が低くなります。
    ///
    /// # 引数
    ///
    /// * `rdr` - `std::io::Read`を実装するリーダー。
    ///
    /// # 戻り値
    ///
    /// 新しい`Dictionary`インスタンス。
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - データを読み込めない場合。
    /// - マジックナンバーが一致しない、またはデータが破損している場合
    ///   ([`WakachiError::DictionaryCorrupt`])。
    pub fn read<R: Read>(mut rdr: R) -> Result<Self> {
        let mut magic = [0; MODEL_MAGIC_LEN];
        rdr.read_exact(&mut magic).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                WakachiError::dictionary_corrupt("the dictionary data is shorter than the format header")
            }
            _ => WakachiError::from(e),
        })?;

        if !magic.starts_with(MODEL_MAGIC) {
            return Err(WakachiError::dictionary_corrupt(
                "the magic number of the dictionary data mismatches",
            ));
        }

        let mut padding_buf = vec![0; PADDING_LEN];
        rdr.read_exact(&mut padding_buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                WakachiError::dictionary_corrupt("the dictionary data is truncated")
            }
            _ => WakachiError::from(e),
        })?;

        let mut buffer = Vec::new();
        rdr.read_to_end(&mut buffer)?;

        let mut aligned_bytes = AlignedVec::with_capacity(buffer.len());
        aligned_bytes.extend_from_slice(&buffer);

        let archived = access::<ArchivedDictionaryInner, Error>(&aligned_bytes).map_err(|e| {
            WakachiError::dictionary_corrupt(format!(
                "rkyv validation failed. The dictionary data may be corrupted or incompatible: {e}"
            ))
        })?;

        // SAFETY: AlignedVec ensures correct alignment for ArchivedDictionaryInner
        let data: &'static ArchivedDictionaryInner = unsafe { &*(archived as *const _) };

        Ok(
            Self::Archived(
                ArchivedDictionary { _buffer: DictBuffer::Aligned(aligned_bytes), data }
            )
        )
    }

    /// メモリマッピングを使用してファイルパスから辞書を作成します。
    ///
    /// この関数は、辞書ファイルをメモリにマップしてゼロコピーアクセスを実現し、
    /// 高いパフォーマンスとメモリ効率を提供します。読み込み動作は`mode`パラメータで
    /// 設定でき、安全性とパフォーマンスのバランスを調整できます。
    ///
    /// | モード | 検証 | キャッシュ書き込み | 用途 |
    /// |------|-------------|---------------|-----------|
    /// | `Validate` | 毎回完全検証 | ❌ | 最大の安全性 |
    /// | `TrustCache` | プルーフファイルが存在する場合はスキップ | ✅ | 高速な再読み込み |
    ///
    /// ## キャッシングメカニズム(`LoadMode::TrustCache`)
    ///
    /// 後続の読み込みを高速化するため、この関数は`TrustCache`モードが有効な場合に
    /// キャッシュメカニズムを使用します。辞書ファイルのメタデータ(サイズ、更新時刻など)から
    /// 一意のハッシュを生成し、対応する「プルーフファイル」(例: `<hash>.sha256`)を探して、
    /// 完全な検証を行わずに辞書の妥当性を証明します。
    ///
    /// このプルーフファイルの検索は2つの場所で行われます:
    /// 1.  **ローカルキャッシュ**: 辞書ファイルと同じディレクトリ内の`.cache`。
    ///     これにより、辞書と一緒に移動できるポータブルなキャッシュが可能になります。
    /// 2.  **グローバルキャッシュ**: システム全体のユーザー固有キャッシュディレクトリ
    ///     (例: Linux上の`~/.cache/wakachi`)。
    ///
    /// いずれかの場所で有効なプルーフファイルが見つかった場合、辞書は追加の検証なしで
    /// 即座に読み込まれます。
    ///
    /// プルーフファイルが見つからない場合、関数は完全な検証を実行します。成功した場合、
    /// **グローバルキャッシュディレクトリに新しいプルーフファイルを作成**して、
    /// 次回の読み込みを高速化します。これにより、読み取り専用の場所にある辞書でも
    /// キャッシングの恩恵を受けることができます。
    ///
    /// # 引数
    ///
    /// - `path` - 辞書ファイルへのパス。
    /// - `mode` - 検証戦略を指定する[`LoadMode`]:
    ///   - `LoadMode::Validate`: 読み込むたびに辞書データの完全な検証を実行します。
    ///     これは最も安全なモードで、**キャッシュファイルを書き込みません**。
    ///     最大の安全性が必要な場合、またはファイル書き込みが禁止されている環境で使用します。
    ///   - `LoadMode::TrustCache`: 上記のキャッシュメカニズムを有効にします。
    ///     有効なプルーフファイルが見つかった場合、高速な未検証読み込みを試みます。
    ///     見つからない場合は、完全な検証にフォールバックし、成功時に
    ///     **グローバルキャッシュにプルーフファイルを作成**します。
    ///     **警告: このモードは、高いパフォーマンスを実現するためにファイルメタデータを
    ///     信頼して検証をスキップします。辞書ファイルが悪意のある攻撃者によって
    ///     置き換えられる可能性がある場合、TOCTOU攻撃に対して脆弱です。ファイルの整合性が
    ///     保証できない環境では`LoadMode::Validate`を使用してください。**
    ///
    /// # 戻り値
    ///
    /// 新しい`Dictionary`インスタンス。
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - パスにファイルが存在しない場合([`WakachiError::DictionaryNotFound`])。
    /// - ファイルが破損している、短すぎる、またはマジックナンバーが一致しない場合
    ///   ([`WakachiError::DictionaryCorrupt`])。
    /// - その他のI/Oエラーが発生した場合。
    ///
    /// 読み込みに失敗しても、既に読み込み済みの他の`Dictionary`インスタンスには
    /// 影響しません。
    pub fn from_path<P: AsRef<std::path::Path>>(path: P, mode: LoadMode) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => WakachiError::dictionary_not_found(path),
            _ => WakachiError::from(e),
        })?;
        let meta = &file.metadata()?;
        if meta.is_dir() {
            return Err(WakachiError::PathIsDirectory(path.to_path_buf()));
        }
        let mut magic = [0u8; MODEL_MAGIC_LEN];
        file.read_exact(&mut magic).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                WakachiError::dictionary_corrupt("the dictionary file is shorter than the format header")
            }
            _ => WakachiError::from(e),
        })?;

        if !magic.starts_with(MODEL_MAGIC) {
            return Err(WakachiError::dictionary_corrupt(
                "the magic number of the dictionary file mismatches",
            ));
        }

        let mmap = unsafe { Mmap::map(&file)? };

        let Some(data_bytes) = &mmap.get(DATA_START..) else {
            return Err(WakachiError::dictionary_corrupt(
                "the dictionary file is too small or truncated",
            ));
        };

        let current_hash = compute_metadata_hash(meta);
        let hash_name = format!("{}.sha256", current_hash);
        let hash_path = path.parent().unwrap().join(".cache").join(&hash_name);

        if mode == LoadMode::TrustCache
            && hash_path.exists() {
                let archived = unsafe { access_unchecked::<ArchivedDictionaryInner>(data_bytes) };
                let data: &'static ArchivedDictionaryInner = unsafe { &*(archived as *const _) };
                return {
                    Ok(
                        Dictionary::Archived(ArchivedDictionary { _buffer: DictBuffer::Mmap(mmap), data })
                    )
                };
            }

        let global_cache_dir = GLOBAL_CACHE_DIR.as_ref().ok_or_else(|| {
            WakachiError::invalid_state("Could not determine system cache directory.", "")
        })?;

        let hash_path = global_cache_dir.join(&hash_name);

        if mode == LoadMode::TrustCache
            && hash_path.exists() {
                let archived = unsafe { access_unchecked::<ArchivedDictionaryInner>(data_bytes) };
                let data: &'static ArchivedDictionaryInner = unsafe { &*(archived as *const _) };
                return {
                    Ok(
                        Dictionary::Archived(ArchivedDictionary { _buffer: DictBuffer::Mmap(mmap), data })
                    )
                };
            }

        match access::<ArchivedDictionaryInner, Error>(data_bytes) {
            Ok(archived) => {
                if mode == LoadMode::TrustCache {
                    create_dir_all(global_cache_dir)?;
                    File::create_new(hash_path)?;
                }

                let data: &'static ArchivedDictionaryInner = unsafe { &*(archived as *const _) };
                Ok(Self::Archived(
                    ArchivedDictionary {
                        _buffer: DictBuffer::Mmap(mmap),
                        data,
                    }
                ))
            }
            Err(_) => {
                // Retry on an aligned heap copy in case the failure came from
                // the mapping's alignment rather than the data itself.
                let mut aligned_bytes = AlignedVec::with_capacity(data_bytes.len());
                aligned_bytes.extend_from_slice(data_bytes);

                let archived = access::<ArchivedDictionaryInner, Error>(&aligned_bytes).map_err(|e| {
                    WakachiError::dictionary_corrupt(format!(
                        "rkyv validation failed. The dictionary file may be corrupted or incompatible: {e}"
                    ))
                })?;

                let data: &'static ArchivedDictionaryInner = unsafe { &*(archived as *const _) };
                Ok(Self::Archived(
                    ArchivedDictionary {
                        _buffer: DictBuffer::Aligned(aligned_bytes),
                        data,
                    }
                ))
            }
        }
    }

    /// 指定されたキャッシング戦略を使用してZstandard圧縮ファイルから辞書を読み込みます。
    ///
    /// この関数は、最も一般的なキャッシングシナリオに対してユーザーフレンドリーな
    /// インターフェースを提供します。より細かい制御が必要な場合は、
    /// [`from_zstd_with_options`](Self::from_zstd_with_options)を参照してください。
    ///
    /// # 引数
    ///
    /// * `path` - Zstandard圧縮辞書ファイルへのパス。
    /// * `strategy` - [`CacheStrategy`]列挙型で定義される希望のキャッシング戦略。
    ///
    /// # 戻り値
    ///
    /// 新しい`Dictionary`インスタンス。
    ///
    /// # エラー
    ///
    /// この関数は、[`from_zstd_with_options`](Self::from_zstd_with_options)のエラーに加えて、
    /// (`strategy`によって決定される)キャッシュディレクトリが作成できない、
    /// または書き込めない場合にエラーを返します。
    pub fn from_zstd<P: AsRef<std::path::Path>>(path: P, strategy: CacheStrategy) -> Result<Self> {
        let path = path.as_ref();

        let cache_dir = match strategy {
            CacheStrategy::Local => {
                let parent = path.parent().ok_or_else(|| {
                    WakachiError::invalid_argument(
                        "path",
                        "Input path must have a parent directory for the Local cache strategy.",
                    )
                })?;
                let local_cache = parent.join(".cache");
                std::fs::create_dir_all(&local_cache)?;
                local_cache
            }
            CacheStrategy::GlobalCache => {
                let global_cache = GLOBAL_CACHE_DIR.as_ref().ok_or_else(|| {
                    WakachiError::invalid_state("Could not determine system cache directory.", "")
                })?;
                global_cache.to_path_buf()
            }
            CacheStrategy::GlobalData => {
                let local_data = GLOBAL_DATA_DIR.as_ref().ok_or_else(|| {
                    WakachiError::invalid_state("Could not determine local data directory.", "")
                })?;
                local_data.to_path_buf()
            }
        };

        Self::from_zstd_with_options(path, cache_dir)
    }

    /// 設定可能なキャッシングオプションを使用してZstandard圧縮ファイルから辞書を読み込みます。
    ///
    /// これは[`from_zstd`](Self::from_zstd)の高度なバージョンで、キャッシュディレクトリの
    /// 細かい制御を可能にします。特定のディレクトリ構造や制限的なファイルシステム権限を
    /// 持つ環境で有用です。
    ///
    /// ## キャッシングメカニズム
    ///
    /// 実行ごとにファイルを展開するのを避けるため、この関数はキャッシュメカニズムを
    /// 採用しています。入力`.zst`ファイルのメタデータ(サイズや更新時刻など)から
    /// 一意のハッシュを生成します。このハッシュは、展開されたキャッシュのファイル名として
    /// 使用されます。
    ///
    /// 後続の実行時に、現在のメタデータハッシュに対応するキャッシュファイルが存在する場合、
    /// 展開ステップが完全にスキップされ、ほぼ瞬時の読み込みが可能になります。
    /// `.zst`ファイルが変更されると、そのメタデータハッシュが変更され、新しいキャッシュが
    /// 自動的に生成されます。
    ///
    /// # 引数
    ///
    /// * `path` - Zstandard圧縮辞書ファイルへのパス。
    /// * `cache_dir` - 展開された辞書キャッシュが保存されるディレクトリ。
    ///
    /// # 戻り値
    ///
    /// 新しい`Dictionary`インスタンス。
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - `path`にファイルが存在しない場合([`WakachiError::DictionaryNotFound`])。
    /// - ファイルが有効なZstandard圧縮アーカイブでない場合。
    /// - 展開されたデータが有効な辞書ファイルでない場合
    ///   ([`WakachiError::DictionaryCorrupt`])。
    /// - `cache_dir`で指定されたキャッシュディレクトリが作成できない、
    ///   または書き込めない場合。
    pub fn from_zstd_with_options<P, Q>(path: P, cache_dir: Q) -> Result<Self>
    where
        P: AsRef<std::path::Path>,
        Q: AsRef<std::path::Path>,
    {
        let zstd_path = path.as_ref();
        let zstd_file = File::open(zstd_path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => WakachiError::dictionary_not_found(zstd_path),
            _ => WakachiError::from(e),
        })?;
        let meta = zstd_file.metadata()?;

        let dict_hash = compute_metadata_hash(&meta);
        let decompressed_dir = cache_dir.as_ref().to_path_buf();

        let decompressed_dict_path = decompressed_dir.join(format!("{}.dic", dict_hash));

        if decompressed_dict_path.exists() {
            return Self::from_path(decompressed_dict_path, LoadMode::TrustCache);
        }

        if !decompressed_dir.exists() {
            create_dir_all(&decompressed_dir)?;
        }

        let mut temp_file = tempfile::NamedTempFile::new_in(&decompressed_dir)?;

        {
            let mut decoder = zstd::Decoder::new(zstd_file)?;

            io::copy(&mut decoder, &mut temp_file)?;
            temp_file.as_file().sync_all()?;
        }
        temp_file.seek(SeekFrom::Start(0))?;

        let mut magic = [0; MODEL_MAGIC_LEN];
        temp_file.read_exact(&mut magic).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                WakachiError::dictionary_corrupt("the decompressed dictionary is shorter than the format header")
            }
            _ => WakachiError::from(e),
        })?;

        if !magic.starts_with(MODEL_MAGIC) {
            return Err(WakachiError::dictionary_corrupt(
                "the magic number of the decompressed dictionary mismatches",
            ));
        }

        temp_file.seek(SeekFrom::Start(0))?;

        let mut data_bytes = Vec::new();
        temp_file.as_file_mut().read_to_end(&mut data_bytes)?;

        let mut aligned_bytes: AlignedVec = AlignedVec::with_capacity(data_bytes.len());
        aligned_bytes.extend_from_slice(&data_bytes);

        let Some(data_bytes) = &aligned_bytes.get(DATA_START..) else {
            return Err(WakachiError::dictionary_corrupt(
                "the decompressed dictionary is too small or truncated",
            ));
        };

        let _ = access::<ArchivedDictionaryInner, Error>(data_bytes).map_err(|e| {
            WakachiError::dictionary_corrupt(format!(
                "rkyv validation failed. The dictionary file may be corrupted or incompatible: {e}"
            ))
        })?;

        temp_file.persist(&decompressed_dict_path)?;

        let decompressed_dict_hash =
            compute_metadata_hash(&File::open(&decompressed_dict_path)?.metadata()?);
        let decompressed_dict_hash_path =
            decompressed_dir.join(format!("{}.sha256", decompressed_dict_hash));

        File::create_new(decompressed_dict_hash_path)?;

        Self::from_path(decompressed_dict_path, LoadMode::TrustCache)
    }

    /// Zstandard圧縮辞書を指定されたパスに展開します。
    ///
    /// この関数は、`.zst`圧縮辞書を読み込み、その内容を検証し、
    /// 展開された辞書を`output_path`に書き込みます。
    ///
    /// これは、アプリケーションのセットアップ、テスト、または
    /// カスタムキャッシュ管理に有用な低レベルユーティリティです。
    ///
    /// # 引数
    ///
    /// * `input_path` - Zstandard圧縮辞書ファイルへのパス。
    /// * `output_path` - 展開された辞書が保存されるパス。
    ///
    /// # 戻り値
    ///
    /// 成功時は`Ok(())`。
    ///
    /// # エラー
    ///
    /// この関数は以下の場合にエラーを返します:
    /// - 入力ファイルを読み込めない場合。
    /// - 有効なZstandard圧縮アーカイブでない場合。
    /// - 展開されたデータが有効な辞書でない場合([`WakachiError::DictionaryCorrupt`])。
    /// - 出力パスに書き込めない場合。
    pub fn decompress_zstd<P, Q>(input_path: P, output_path: Q) -> Result<()>
    where
        P: AsRef<std::path::Path>,
        Q: AsRef<std::path::Path>,
    {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        let output_dir = output_path.parent().ok_or_else(|| {
            WakachiError::invalid_argument("output_path", "Output path must have a parent directory.")
        })?;
        std::fs::create_dir_all(output_dir)?;

        let zstd_file = File::open(input_path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => WakachiError::dictionary_not_found(input_path),
            _ => WakachiError::from(e),
        })?;
        let mut temp_file = tempfile::NamedTempFile::new_in(output_dir)?;

        let mut decoder = zstd::Decoder::new(zstd_file)?;
        io::copy(&mut decoder, &mut temp_file)?;

        temp_file.seek(SeekFrom::Start(0))?;
        let mut magic = [0; MODEL_MAGIC_LEN];
        temp_file.read_exact(&mut magic).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                WakachiError::dictionary_corrupt("the decompressed dictionary is shorter than the format header")
            }
            _ => WakachiError::from(e),
        })?;

        if !magic.starts_with(MODEL_MAGIC) {
            return Err(WakachiError::dictionary_corrupt(
                "the magic number of the decompressed dictionary mismatches",
            ));
        }

        temp_file.seek(SeekFrom::Start(0))?;
        let mut data_bytes = Vec::new();
        temp_file.as_file_mut().read_to_end(&mut data_bytes)?;

        let mut aligned_bytes: AlignedVec = AlignedVec::with_capacity(data_bytes.len());
        aligned_bytes.extend_from_slice(&data_bytes);

        let Some(data_bytes) = &aligned_bytes.get(DATA_START..) else {
            return Err(WakachiError::dictionary_corrupt(
                "the decompressed dictionary is too small or truncated",
            ));
        };

        let _ = access::<ArchivedDictionaryInner, Error>(data_bytes).map_err(|e| {
            WakachiError::dictionary_corrupt(format!(
                "rkyv validation failed. The dictionary file may be corrupted or incompatible: {e}"
            ))
        })?;

        temp_file.persist(output_path)?;

        Ok(())
    }
}

/// ファイルメタデータからハッシュを計算します。
///
/// この関数は、ファイルのメタデータ(サイズ、更新時刻、iノードなど)から
/// 一意のSHA256ハッシュを生成します。このハッシュは、キャッシュファイルの
/// 命名とファイルの同一性確認に使用されます。
///
/// # 引数
///
/// * `meta` - ハッシュを計算するファイルのメタデータ。
///
/// # 戻り値
///
/// メタデータのSHA256ハッシュの16進数表現文字列。
///
/// # プラットフォーム固有の動作
///
/// - Unix: デバイスID、iノード、サイズ、変更時刻を使用
/// - Windows: ファイルサイズ、最終書き込み時刻、作成時刻、ファイル属性を使用
/// - その他: ファイルタイプ、読み取り専用フラグ、サイズ、変更時刻、作成時刻を使用
#[inline(always)]
pub(crate) fn compute_metadata_hash(meta: &Metadata) -> String {
    let mut hasher = Sha256::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        hasher.update(meta.dev().to_le_bytes());
        hasher.update(meta.ino().to_le_bytes());
        hasher.update(meta.size().to_le_bytes());
        hasher.update(meta.mtime().to_le_bytes());
        hasher.update(meta.mtime_nsec().to_le_bytes());
    }

    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        hasher.update(meta.file_size().to_le_bytes());
        hasher.update(meta.last_write_time().to_le_bytes());
        hasher.update(meta.creation_time().to_le_bytes());
        hasher.update(meta.file_attributes().to_le_bytes());
    }

    #[cfg(not(any(unix, windows)))]
    {
        use std::time::SystemTime;

        fn update_system_time(
            time: Result<SystemTime, std::io::Error>,
            hasher: &mut Sha256,
        ) {
            match time.and_then(|t| {
                t.duration_since(SystemTime::UNIX_EPOCH)
                    .map_err(|_| std::io::Error::from(std::io::ErrorKind::Other))
            }) {
                Ok(duration) => {
                    hasher.update(duration.as_secs().to_le_bytes());
                    hasher.update(duration.subsec_nanos().to_le_bytes());
                }
                Err(_) => {
                    hasher.update([0u8; 12]);
                }
            }
        }

        let file_type = meta.file_type();
        let type_byte: u8 = if file_type.is_file() { 0x01 }
        else if file_type.is_dir() { 0x02 }
        else if file_type.is_symlink() { 0x03 }
        else { 0x00 };
        hasher.update([type_byte]);

        let readonly_byte: u8 = if meta.permissions().readonly() { 0x01 } else { 0x00 };
        hasher.update([readonly_byte]);

        hasher.update(meta.len().to_le_bytes());

        update_system_time(meta.modified(), &mut hasher);

        update_system_time(meta.created(), &mut hasher);
    }

    hex::encode(hasher.finalize())
}

impl<'a> DictionaryInnerRef<'a> {
    /// 指定された単語のパラメータを取得します。
    ///
    /// # 引数
    ///
    /// * `word_idx` - 単語のインデックス。辞書の種類と位置を含みます。
    ///
    /// # 戻り値
    ///
    /// 単語のパラメータ(`WordParam`)。左接続ID、右接続ID、単語コストを含みます。
    #[inline(always)]
    pub(crate) fn word_param(&self, word_idx: WordIdx) -> WordParam {
        match self {
            DictionaryInnerRef::Archived(archived_dict) => {
                archived_dict.word_param(word_idx)
            },
            DictionaryInnerRef::Owned(dict) => {
                dict.word_param(word_idx)
            },
        }
    }

    /// 指定された単語の品詞パス文字列への参照を取得します。
    ///
    /// # 引数
    ///
    /// * `word_idx` - 単語のインデックス。辞書の種類と位置を含みます。
    ///
    /// # 戻り値
    ///
    /// 品詞パス文字列への参照。
    #[inline(always)]
    pub(crate) fn word_pos(&self, word_idx: WordIdx) -> &'a str {
        match self {
            DictionaryInnerRef::Archived(archived_dict) => {
                archived_dict.word_pos(word_idx)
            },
            DictionaryInnerRef::Owned(dict) => {
                dict.word_pos(word_idx)
            },
        }
    }
}

impl ArchivedDictionaryInner {
    /// コネクタへの参照を取得します。
    ///
    /// # 戻り値
    ///
    /// アーカイブされた`MatrixConnector`への参照。
    #[inline(always)]
    pub(crate) fn connector(&self) -> &ArchivedMatrixConnector {
        &self.connector
    }
    /// システム辞書への参照を取得します。
    ///
    /// # 戻り値
    ///
    /// アーカイブされたシステム辞書(`ArchivedLexicon`)への参照。
    #[inline(always)]
    pub(crate) fn system_lexicon(&self) -> &ArchivedLexicon {
        &self.system_lexicon
    }
    /// ユーザー辞書への参照を取得します。
    ///
    /// # 戻り値
    ///
    /// アーカイブされたユーザー辞書への参照。
    #[inline(always)]
    pub(crate) fn user_lexicon(&self) -> &Archived<Option<Lexicon>> {
        &self.user_lexicon
    }
    /// 未知語ハンドラへの参照を取得します。
    ///
    /// # 戻り値
    ///
    /// アーカイブされた未知語ハンドラ(`ArchivedUnkHandler`)への参照。
    #[inline(always)]
    pub(crate) fn unk_handler(&self) -> &ArchivedUnkHandler {
        &self.unk_handler
    }
    /// 指定された単語のパラメータを取得します。
    ///
    /// # 引数
    ///
    /// * `word_idx` - 単語のインデックス。辞書の種類と位置を含みます。
    ///
    /// # 戻り値
    ///
    /// 単語のパラメータ(`WordParam`)。左接続ID、右接続ID、単語コストを含みます。
    #[inline(always)]
    pub(crate) fn word_param(&self, word_idx: WordIdx) -> WordParam {
        match word_idx.lex_type {
            LexType::System => self.system_lexicon().word_param(word_idx),
            LexType::User => self.user_lexicon().as_ref().unwrap().word_param(word_idx),
            LexType::Unknown => self.unk_handler().word_param(word_idx),
        }
    }

    /// 指定された単語の品詞パス文字列への参照を取得します。
    ///
    /// # 引数
    ///
    /// * `word_idx` - 単語のインデックス。辞書の種類と位置を含みます。
    ///
    /// # 戻り値
    ///
    /// 品詞パス文字列への参照。
    #[inline(always)]
    pub fn word_pos(&self, word_idx: WordIdx) -> &str {
        match word_idx.lex_type {
            LexType::System => self.system_lexicon().word_pos(word_idx),
            LexType::User => self.user_lexicon().as_ref().unwrap().word_pos(word_idx),
            LexType::Unknown => self.unk_handler().word_pos(word_idx),
        }
    }

    /// 指定された登録語の語彙情報への参照を取得します。
    ///
    /// # 引数
    ///
    /// * `word_idx` - 単語のインデックス。辞書の種類と位置を含みます。
    ///
    /// # Panics
    ///
    /// 未知語の`WordIdx`を渡した場合はパニックします。未知語は語彙情報を持ちません。
    #[inline(always)]
    pub(crate) fn word_info(&self, word_idx: WordIdx) -> &ArchivedWordInfo {
        match word_idx.lex_type {
            LexType::System => self.system_lexicon().word_info(word_idx),
            LexType::User => self.user_lexicon().as_ref().unwrap().word_info(word_idx),
            LexType::Unknown => unreachable!(),
        }
    }

    /// 指定された単語を先頭構成要素とする複合語の候補をバッファへ書き出します。
    ///
    /// 未知語は複合語に参加しないため、未知語の`WordIdx`に対しては
    /// 空の候補列を書き出します。
    ///
    /// # 引数
    ///
    /// * `word_idx` - 先頭構成要素の単語インデックス。
    /// * `out` - 候補の単語ID列を書き出すバッファ。
    #[inline(always)]
    pub(crate) fn compound_candidates_to(&self, word_idx: WordIdx, out: &mut Vec<u32>) {
        match word_idx.lex_type {
            LexType::System => self
                .system_lexicon()
                .compound_candidates_to(word_idx.word_id, out),
            LexType::User => self
                .user_lexicon()
                .as_ref()
                .unwrap()
                .compound_candidates_to(word_idx.word_id, out),
            LexType::Unknown => out.clear(),
        }
    }
}
