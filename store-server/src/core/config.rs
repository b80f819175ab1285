use std::path::PathBuf;

/// 服务器配置 - 店铺后端的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/vitrina | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | PUBLIC_SITE_URL | http://localhost:3000 | 站点地址 (邮件中的绝对图片链接) |
/// | ADMIN_NOTIFY_EMAIL | 空 | 新订单通知收件人 |
/// | SMTP_HOST | 未设置 = 邮件禁用 | SMTP 服务器 |
/// | SMTP_PORT | 587 | SMTP 端口 |
/// | SMTP_USERNAME / SMTP_PASSWORD | 空 | SMTP 凭证 |
/// | SMTP_FROM | SMTP_USERNAME | 发件人地址 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/vitrina HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 站点公开地址，用于在邮件里拼接绝对图片链接
    pub public_site_url: String,
    /// 新订单管理员通知收件人
    pub admin_notify_email: String,
    /// SMTP 配置 (None = 邮件发送禁用，只记录日志)
    pub smtp: Option<SmtpConfig>,
}

/// SMTP 邮件中继配置
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// 发件人地址
    pub from: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let smtp = std::env::var("SMTP_HOST").ok().map(|host| {
            let username = std::env::var("SMTP_USERNAME").unwrap_or_default();
            SmtpConfig {
                host,
                port: std::env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(587),
                from: std::env::var("SMTP_FROM").unwrap_or_else(|_| username.clone()),
                username,
                password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
            }
        });

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/vitrina".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            public_site_url: std::env::var("PUBLIC_SITE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            admin_notify_email: std::env::var("ADMIN_NOTIFY_EMAIL").unwrap_or_default(),
            smtp,
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.smtp = None;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录 (work_dir/logs)
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
