use thiserror::Error;

/// エラー型の定義
#[derive(Error, Debug)]
pub enum Error {
    #[error("認識できない出力名です: \"{0}\"")]
    UnrecognizedOutput(String),

    #[error("不明なメトリクス名です: \"{0}\"")]
    UnknownMetric(String),

    #[error("このメトリクスはここでは使用できません: {0}")]
    InvalidMetric(String),

    #[error("出力 \"{0}\" に対する予測値がありません")]
    MissingPrediction(String),

    #[error("長さが一致しません: 期待値 {expected}, 実際 {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("次元不一致エラー: {0}")]
    DimensionMismatch(String),

    #[error("データ一貫性エラー: {0}")]
    Consistency(String),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("データ形式エラー: {0}")]
    Format(String),

    #[error("入出力エラー")]
    Io(#[source] std::io::Error),

    #[error("CSVエラー")]
    Csv(#[source] csv::Error),

    #[error("JSONエラー")]
    Json(#[source] serde_json::Error),
}

/// Resultの型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
