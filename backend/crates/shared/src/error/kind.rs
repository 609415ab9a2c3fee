//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum that classifies failures of a gated session.

/// エラー種別の列挙体
///
/// 接続単位のセッションで発生する失敗の分類を定義します。
/// どの種別もリトライ対象ではありません（リトライはクライアント側の責務）。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::Protocol;
/// assert_eq!(kind.as_str(), "Protocol Error");
/// assert!(kind.is_peer_fault());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// ヘッダの形式が不正（フィールド数、バージョン、bits、日付、カウンタ）
    Protocol,
    /// 応答が発行したチャレンジに対応していない
    ChallengeMismatch,
    /// 応答のダイジェストが要求された先頭ゼロビット数を満たさない
    VerificationFailed,
    /// 接続の読み書きに失敗した
    Transport,
    /// 期限切れ、または外部からのキャンセル
    Timeout,
    /// 要求されたリソースが存在しない
    NotFound,
    /// サーバー内部エラー（乱数源の枯渇、設定不備など）
    Internal,
}

impl ErrorKind {
    /// 人間向けの文字列表現を取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::Timeout.as_str(), "Timeout");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Protocol => "Protocol Error",
            ErrorKind::ChallengeMismatch => "Challenge Mismatch",
            ErrorKind::VerificationFailed => "Verification Failed",
            ErrorKind::Transport => "Transport Error",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Internal => "Internal Error",
        }
    }

    /// ピア（クライアント）側に原因があるかどうかを判定
    ///
    /// 不正なヘッダ、対応しない応答、不十分な計算結果は `true` を返します。
    #[inline]
    pub const fn is_peer_fault(&self) -> bool {
        matches!(
            self,
            ErrorKind::Protocol | ErrorKind::ChallengeMismatch | ErrorKind::VerificationFailed
        )
    }

    /// サーバー側のエラーかどうかを判定
    ///
    /// `Internal` のみ `true` を返します。
    /// これらのエラーは error レベルでログに記録すべきです。
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, ErrorKind::Internal)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
