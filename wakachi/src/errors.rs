//! エラー型の定義
//!
//! このモジュールは、Wakachiライブラリで使用されるすべてのエラー型を定義します。

use std::error::Error;
use std::fmt::{self, Debug};

/// Wakachi専用のResult型
///
/// エラー型としてデフォルトで[`WakachiError`]を使用します。
pub type Result<T, E = WakachiError> = std::result::Result<T, E>;

/// Wakachiのエラー型
///
/// このライブラリで発生する可能性のあるすべてのエラーを表現します。
/// 各バリアントは特定のエラー条件に対応しています。
#[derive(Debug, thiserror::Error)]
pub enum WakachiError {
    /// 辞書ファイルが存在しないエラー
    ///
    /// [`DictionaryNotFoundError`]のエラーバリアント。
    #[error(transparent)]
    DictionaryNotFound(DictionaryNotFoundError),

    /// 辞書ファイルが破損しているエラー
    ///
    /// [`DictionaryCorruptError`]のエラーバリアント。
    #[error(transparent)]
    DictionaryCorrupt(DictionaryCorruptError),

    /// 入力テキストが無効なエラー
    ///
    /// [`InvalidInputError`]のエラーバリアント。
    #[error(transparent)]
    InvalidInput(InvalidInputError),

    /// 経路解決に失敗したエラー
    ///
    /// [`PathResolutionFailedError`]のエラーバリアント。
    /// 正しく構築されたラティスでは発生しない内部不変条件の違反を表します。
    #[error(transparent)]
    PathResolutionFailed(PathResolutionFailedError),

    /// 無効な引数エラー
    ///
    /// [`InvalidArgumentError`]のエラーバリアント。
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// 無効なフォーマットエラー
    ///
    /// [`InvalidFormatError`]のエラーバリアント。
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// 無効な状態エラー
    ///
    /// [`InvalidStateError`]のエラーバリアント。
    #[error(transparent)]
    InvalidState(InvalidStateError),

    /// 整数変換エラー
    ///
    /// [`TryFromIntError`](std::num::TryFromIntError)のエラーバリアント。
    #[error(transparent)]
    TryFromInt(std::num::TryFromIntError),

    /// 整数パースエラー
    ///
    /// [`ParseIntError`](std::num::ParseIntError)のエラーバリアント。
    #[error(transparent)]
    ParseInt(std::num::ParseIntError),

    /// UTF-8エンコーディングエラー
    ///
    /// [`std::str::Utf8Error`]のエラーバリアント。
    #[error(transparent)]
    Utf8(std::str::Utf8Error),

    /// ディレクトリが指定されたエラー
    ///
    /// ファイルが期待される場所にディレクトリが指定された場合に発生します。
    #[error("The path '{0}' is a directory, but a file was expected.")]
    PathIsDirectory(std::path::PathBuf),

    /// I/Oエラー
    ///
    /// [`std::io::Error`](std::io::Error)のエラーバリアント。
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// rkyvシリアライゼーションエラー
    ///
    /// [`rkyv::rancor::Error`](rkyv::rancor::Error)のエラーバリアント。
    #[error(transparent)]
    RkyvError(#[from] rkyv::rancor::Error),

    /// 一時ファイルの永続化エラー
    ///
    /// [`tempfile::PersistError`]のエラーバリアント。
    #[error(transparent)]
    PathPersist(#[from] tempfile::PersistError),
}

impl WakachiError {
    /// 辞書ファイル不在エラーを生成します
    ///
    /// # 引数
    ///
    /// * `path` - 存在しなかった辞書ファイルのパス
    pub(crate) fn dictionary_not_found<P>(path: P) -> Self
    where
        P: Into<std::path::PathBuf>,
    {
        Self::DictionaryNotFound(DictionaryNotFoundError { path: path.into() })
    }

    /// 辞書破損エラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    pub(crate) fn dictionary_corrupt<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::DictionaryCorrupt(DictionaryCorruptError { msg: msg.into() })
    }

    /// 無効入力エラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_input<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidInput(InvalidInputError { msg: msg.into() })
    }

    /// 経路解決失敗エラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    pub(crate) fn path_resolution_failed<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::PathResolutionFailed(PathResolutionFailedError { msg: msg.into() })
    }

    /// 無効な引数エラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - 引数の名前
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効なフォーマットエラーを生成します
    ///
    /// # 引数
    ///
    /// * `arg` - フォーマット名
    /// * `msg` - エラーメッセージ
    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    /// 無効な状態エラーを生成します
    ///
    /// # 引数
    ///
    /// * `msg` - エラーメッセージ
    /// * `cause` - エラーの原因
    pub(crate) fn invalid_state<S, M>(msg: S, cause: M) -> Self
    where
        S: Into<String>,
        M: Into<String>,
    {
        Self::InvalidState(InvalidStateError {
            msg: msg.into(),
            cause: cause.into(),
        })
    }
}

/// 辞書ファイルが見つからない場合に使用されるエラー
#[derive(Debug)]
pub struct DictionaryNotFoundError {
    /// 存在しなかったパス
    pub(crate) path: std::path::PathBuf,
}

impl fmt::Display for DictionaryNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "DictionaryNotFoundError: no dictionary file at {}",
            self.path.display()
        )
    }
}

impl Error for DictionaryNotFoundError {}

/// 辞書ファイルが破損している場合に使用されるエラー
#[derive(Debug)]
pub struct DictionaryCorruptError {
    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for DictionaryCorruptError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "DictionaryCorruptError: {}", self.msg)
    }
}

impl Error for DictionaryCorruptError {}

/// 入力テキストが受理できない場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidInputError {
    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidInputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidInputError: {}", self.msg)
    }
}

impl Error for InvalidInputError {}

/// ラティスの経路解決が失敗した場合に使用されるエラー
///
/// ラティスが端から端まで連結であるという構築時の不変条件が破られた
/// ことを意味します。通常の使用で発生することはありません。
#[derive(Debug)]
pub struct PathResolutionFailedError {
    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for PathResolutionFailedError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PathResolutionFailedError: {}", self.msg)
    }
}

impl Error for PathResolutionFailedError {}

/// 引数が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// 引数の名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

/// 入力フォーマットが無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidFormatError {
    /// フォーマットの名前
    pub(crate) arg: &'static str,

    /// エラーメッセージ
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidFormatError {}

/// 状態が無効な場合に使用されるエラー
#[derive(Debug)]
pub struct InvalidStateError {
    /// エラーメッセージ
    pub(crate) msg: String,

    /// エラーの根本原因
    pub(crate) cause: String,
}

impl fmt::Display for InvalidStateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidStateError: {}: {}", self.msg, self.cause)
    }
}

impl Error for InvalidStateError {}

impl From<std::num::TryFromIntError> for WakachiError {
    fn from(error: std::num::TryFromIntError) -> Self {
        Self::TryFromInt(error)
    }
}

impl From<std::num::ParseIntError> for WakachiError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::ParseInt(error)
    }
}

impl From<std::str::Utf8Error> for WakachiError {
    fn from(error: std::str::Utf8Error) -> Self {
        Self::Utf8(error)
    }
}
