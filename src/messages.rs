//! Localized run output
//!
//! Every supported [`Locale`] maps to one static [`Catalog`] of templates.
//! Templates hold `{}` placeholders that [`fill`] replaces in order, so a
//! translation may move the arguments around the surrounding words but not
//! reorder them. Numbers are formatted by the caller.
//!
//! The locale comes from `-l/--language`, then `TCPING_LANG`, `LC_ALL`,
//! `LC_MESSAGES` and `LANG`, and falls back to en-US.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Write as _};

/// Application specific language override
pub const LANGUAGE_ENV: &str = "TCPING_LANG";

/// Consulted in order after [`LANGUAGE_ENV`]; the first non-empty one wins
const LOCALE_ENV: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "ja-JP")]
    JaJp,
    #[serde(rename = "ko-KR")]
    KoKr,
}

impl Locale {
    pub const ALL: [Locale; 5] = [
        Locale::EnUs,
        Locale::ZhCn,
        Locale::ZhTw,
        Locale::JaJp,
        Locale::KoKr,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::ZhCn => "zh-CN",
            Locale::ZhTw => "zh-TW",
            Locale::JaJp => "ja-JP",
            Locale::KoKr => "ko-KR",
        }
    }

    /// Map a language code or a POSIX locale string to a supported locale.
    ///
    /// `zh_TW.UTF-8`, `ja`, `ko-kr` and `C` are all understood; anything
    /// unsupported yields `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        let code = code.split(['.', '@']).next().unwrap_or(code);
        let code = code.replace('_', "-").to_lowercase();

        match code.as_str() {
            "en" | "en-us" | "english" | "c" | "posix" => Some(Locale::EnUs),
            "zh" | "zh-cn" | "zh-hans" | "chinese" | "china" => Some(Locale::ZhCn),
            "zh-tw" | "zh-hant" | "chinese-traditional" | "taiwan" => Some(Locale::ZhTw),
            "ja" | "ja-jp" | "japanese" | "japan" => Some(Locale::JaJp),
            "ko" | "ko-kr" | "korean" | "korea" => Some(Locale::KoKr),
            _ => None,
        }
    }

    /// Locale named by an explicit code, unsupported codes fall back to en-US
    pub fn from_code_or_default(code: &str) -> Self {
        Self::from_code(code).unwrap_or_default()
    }

    /// Locale of the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        std::iter::once(LANGUAGE_ENV)
            .chain(LOCALE_ENV)
            .filter_map(|name| lookup(name))
            .find(|value| !value.trim().is_empty())
            .map(|value| Self::from_code_or_default(&value))
            .unwrap_or_default()
    }

    pub fn catalog(&self) -> &'static Catalog {
        match self {
            Locale::EnUs => &EN_US,
            Locale::ZhCn => &ZH_CN,
            Locale::ZhTw => &ZH_TW,
            Locale::JaJp => &JA_JP,
            Locale::KoKr => &KO_KR,
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Message templates of one locale
#[derive(Debug)]
pub struct Catalog {
    /// host, address family, address, port
    pub tcp_banner: &'static str,
    /// uri, version, commit
    pub http_banner: &'static str,
    pub interrupted: &'static str,
    pub tcp_aborted: &'static str,
    pub http_aborted: &'static str,
    /// address, port, seq, time
    pub tcp_response: &'static str,
    /// address, port, seq, error
    pub tcp_failed: &'static str,
    /// status, uri, seq, time, size, bandwidth
    pub http_response: &'static str,
    /// uri, seq, error
    pub http_request_build_failed: &'static str,
    pub http_request_failed: &'static str,
    pub http_read_failed: &'static str,
    /// time, dialed host, port
    pub tcp_attempt_details: &'static str,
    /// local address, remote address, port
    pub tcp_connection_details: &'static str,
    pub http_details_title: &'static str,
    /// status line
    pub http_status: &'static str,
    pub http_headers_title: &'static str,
    pub tcp_statistics_title: &'static str,
    pub http_statistics_title: &'static str,
    /// sent, received, lost, loss percent
    pub statistics_summary: &'static str,
    /// min, max, avg
    pub statistics_rtt: &'static str,
    /// bytes, megabytes
    pub statistics_total_data: &'static str,
    /// min, max, avg
    pub statistics_bandwidth: &'static str,
}

/// Replace each `{}` in `template` with the next argument.
///
/// Surplus placeholders are dropped, surplus arguments ignored.
pub fn fill(template: &str, args: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(template.len() + 16 * args.len());
    let mut args = args.iter();
    let mut rest = template;

    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        if let Some(arg) = args.next() {
            let _ = write!(out, "{}", arg);
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

pub static EN_US: Catalog = Catalog {
    tcp_banner: "TCPing to {} ({} - {}) port {}\n",
    http_banner: "HTTP Ping to {} (User-Agent: tcping/{}.{})\n",
    interrupted: "\nOperation interrupted.\n",
    tcp_aborted: "\nOperation interrupted, connection attempt aborted\n",
    http_aborted: "\nOperation interrupted, HTTP request aborted\n",
    tcp_response: "Response from {}:{}: seq={} time={}ms\n",
    tcp_failed: "TCP connection failed {}:{}: seq={} error={}\n",
    http_response: "HTTP {} {}: seq={} time={}ms size={} bytes bandwidth={} Mbps\n",
    http_request_build_failed: "HTTP request creation failed {}: seq={} error={}\n",
    http_request_failed: "HTTP request failed {}: seq={} error={}\n",
    http_read_failed: "HTTP response read failed {}: seq={} error={}\n",
    tcp_attempt_details: "  Details: Connection attempt took {}ms, target {}:{}\n",
    tcp_connection_details: "  Details: Local address={}, Remote address={}:{}\n",
    http_details_title: "  Details:\n",
    http_status: "    Status: {}\n",
    http_headers_title: "    Response Headers:\n",
    tcp_statistics_title: "\n\n--- TCP ping statistics ---\n",
    http_statistics_title: "\n\n--- HTTP ping statistics ---\n",
    statistics_summary: "Sent = {}, Received = {}, Lost = {} ({}% loss)\n",
    statistics_rtt: "Round-trip times: Min = {}ms, Max = {}ms, Avg = {}ms\n",
    statistics_total_data: "Total data transferred: {} bytes ({} MB)\n",
    statistics_bandwidth: "Estimated bandwidth: Min = {} Mbps, Max = {} Mbps, Avg = {} Mbps\n",
};

pub static ZH_CN: Catalog = Catalog {
    tcp_banner: "正在对 {} ({} - {}) 端口 {} 执行 TCP Ping\n",
    http_banner: "正在对 {} 执行 HTTP Ping (User-Agent: tcping/{}.{})\n",
    interrupted: "\n操作被中断。\n",
    tcp_aborted: "\n操作被中断, 连接尝试已中止\n",
    http_aborted: "\n操作被中断, HTTP请求已中止\n",
    tcp_response: "从 {}:{} 收到响应: seq={} time={}ms\n",
    tcp_failed: "TCP连接失败 {}:{}: seq={} 错误={}\n",
    http_response: "HTTP {} {}: seq={} time={}ms size={} bytes bandwidth={} Mbps\n",
    http_request_build_failed: "HTTP请求创建失败 {}: seq={} 错误={}\n",
    http_request_failed: "HTTP请求失败 {}: seq={} 错误={}\n",
    http_read_failed: "HTTP响应读取失败 {}: seq={} 错误={}\n",
    tcp_attempt_details: "  详细信息: 连接尝试耗时 {}ms, 目标 {}:{}\n",
    tcp_connection_details: "  详细信息: 本地地址={}, 远程地址={}:{}\n",
    http_details_title: "  详细信息:\n",
    http_status: "    状态: {}\n",
    http_headers_title: "    响应头:\n",
    tcp_statistics_title: "\n\n--- 目标主机 TCP ping 统计 ---\n",
    http_statistics_title: "\n\n--- HTTP ping 统计 ---\n",
    statistics_summary: "已发送 = {}, 已接收 = {}, 丢失 = {} ({}% 丢失)\n",
    statistics_rtt: "往返时间(RTT): 最小 = {}ms, 最大 = {}ms, 平均 = {}ms\n",
    statistics_total_data: "总传输数据: {} bytes ({} MB)\n",
    statistics_bandwidth: "估算带宽: 最小 = {} Mbps, 最大 = {} Mbps, 平均 = {} Mbps\n",
};

pub static ZH_TW: Catalog = Catalog {
    tcp_banner: "正在對 {} ({} - {}) 連接埠 {} 執行 TCP Ping\n",
    http_banner: "正在對 {} 執行 HTTP Ping (User-Agent: tcping/{}.{})\n",
    interrupted: "\n操作被中斷。\n",
    tcp_aborted: "\n操作被中斷, 連線嘗試已中止\n",
    http_aborted: "\n操作被中斷, HTTP請求已中止\n",
    tcp_response: "從 {}:{} 收到回應: seq={} time={}ms\n",
    tcp_failed: "TCP連線失敗 {}:{}: seq={} 錯誤={}\n",
    http_response: "HTTP {} {}: seq={} time={}ms size={} bytes bandwidth={} Mbps\n",
    http_request_build_failed: "HTTP請求建立失敗 {}: seq={} 錯誤={}\n",
    http_request_failed: "HTTP請求失敗 {}: seq={} 錯誤={}\n",
    http_read_failed: "HTTP回應讀取失敗 {}: seq={} 錯誤={}\n",
    tcp_attempt_details: "  詳細資訊: 連線嘗試耗時 {}ms, 目標 {}:{}\n",
    tcp_connection_details: "  詳細資訊: 本地地址={}, 遠端地址={}:{}\n",
    http_details_title: "  詳細資訊:\n",
    http_status: "    狀態: {}\n",
    http_headers_title: "    回應標頭:\n",
    tcp_statistics_title: "\n\n--- 目標主機 TCP ping 統計 ---\n",
    http_statistics_title: "\n\n--- HTTP ping 統計 ---\n",
    statistics_summary: "已傳送 = {}, 已接收 = {}, 遺失 = {} ({}% 遺失)\n",
    statistics_rtt: "往返時間(RTT): 最小 = {}ms, 最大 = {}ms, 平均 = {}ms\n",
    statistics_total_data: "總傳輸資料: {} bytes ({} MB)\n",
    statistics_bandwidth: "估算頻寬: 最小 = {} Mbps, 最大 = {} Mbps, 平均 = {} Mbps\n",
};

pub static JA_JP: Catalog = Catalog {
    tcp_banner: "{} ({} - {}) ポート{}にTCP Ping実行中\n",
    http_banner: "{}にHTTP Ping実行中 (User-Agent: tcping/{}.{})\n",
    interrupted: "\n操作が中断されました。\n",
    tcp_aborted: "\n操作が中断されました、接続試行を中止します\n",
    http_aborted: "\n操作が中断されました、HTTPリクエストを中止します\n",
    tcp_response: "{}:{}からレスポンス: seq={} time={}ms\n",
    tcp_failed: "TCP接続失敗 {}:{}: seq={} エラー={}\n",
    http_response: "HTTP {} {}: seq={} time={}ms size={} bytes bandwidth={} Mbps\n",
    http_request_build_failed: "HTTPリクエスト作成失敗 {}: seq={} エラー={}\n",
    http_request_failed: "HTTPリクエスト失敗 {}: seq={} エラー={}\n",
    http_read_failed: "HTTPレスポンス読み取り失敗 {}: seq={} エラー={}\n",
    tcp_attempt_details: "  詳細: 接続試行時間 {}ms、ターゲット {}:{}\n",
    tcp_connection_details: "  詳細: ローカルアドレス={}、リモートアドレス={}:{}\n",
    http_details_title: "  詳細:\n",
    http_status: "    ステータス: {}\n",
    http_headers_title: "    レスポンスヘッダー:\n",
    tcp_statistics_title: "\n\n--- TCP ping統計 ---\n",
    http_statistics_title: "\n\n--- HTTP ping統計 ---\n",
    statistics_summary: "送信 = {}、受信 = {}、損失 = {} ({}% 損失)\n",
    statistics_rtt: "往復時間(RTT): 最小 = {}ms、最大 = {}ms、平均 = {}ms\n",
    statistics_total_data: "総転送データ: {} bytes ({} MB)\n",
    statistics_bandwidth: "推定帯域幅: 最小 = {} Mbps、最大 = {} Mbps、平均 = {} Mbps\n",
};

pub static KO_KR: Catalog = Catalog {
    tcp_banner: "{} ({} - {}) 포트 {}에 TCP Ping 실행 중\n",
    http_banner: "{}에 HTTP Ping 실행 중 (User-Agent: tcping/{}.{})\n",
    interrupted: "\n작업이 중단되었습니다.\n",
    tcp_aborted: "\n작업이 중단되었습니다, 연결 시도를 중단합니다\n",
    http_aborted: "\n작업이 중단되었습니다, HTTP 요청을 중단합니다\n",
    tcp_response: "{}:{}에서 응답: seq={} time={}ms\n",
    tcp_failed: "TCP 연결 실패 {}:{}: seq={} 오류={}\n",
    http_response: "HTTP {} {}: seq={} time={}ms size={} bytes bandwidth={} Mbps\n",
    http_request_build_failed: "HTTP 요청 생성 실패 {}: seq={} 오류={}\n",
    http_request_failed: "HTTP 요청 실패 {}: seq={} 오류={}\n",
    http_read_failed: "HTTP 응답 읽기 실패 {}: seq={} 오류={}\n",
    tcp_attempt_details: "  세부사항: 연결 시도 소요시간 {}ms, 대상 {}:{}\n",
    tcp_connection_details: "  세부사항: 로컬 주소={}, 원격 주소={}:{}\n",
    http_details_title: "  세부사항:\n",
    http_status: "    상태: {}\n",
    http_headers_title: "    응답 헤더:\n",
    tcp_statistics_title: "\n\n--- TCP ping 통계 ---\n",
    http_statistics_title: "\n\n--- HTTP ping 통계 ---\n",
    statistics_summary: "전송 = {}, 수신 = {}, 손실 = {} ({}% 손실)\n",
    statistics_rtt: "왕복시간(RTT): 최소 = {}ms, 최대 = {}ms, 평균 = {}ms\n",
    statistics_total_data: "총 전송 데이터: {} bytes ({} MB)\n",
    statistics_bandwidth: "추정 대역폭: 최소 = {} Mbps, 최대 = {} Mbps, 평균 = {} Mbps\n",
};
