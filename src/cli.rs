use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "disaster-match")]
#[command(about = "防災システム記録とSNS投稿をAIで照合するWebツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Webサーバーを起動
    Serve {
        /// 待ち受けアドレス（例: 0.0.0.0:8080）
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// CSVファイルを照合して結果をJSONで出力
    Analyze {
        /// 防災システム・SNSのCSVファイル
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// 出力JSONファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// コンテンツ生成に対応したモデル一覧を表示
    Models,

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
