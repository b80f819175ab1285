//! Vitrina Store Server - 线上精品店后端服务
//!
//! # 架构概述
//!
//! 本模块是店铺服务端的主入口，提供以下核心功能：
//!
//! - **商品目录** (`db`): 商品、系列、轮播图、整套搭配的嵌入式 SurrealDB 存储
//! - **下单流程** (`checkout`): 校验、运费、库存原子扣减
//! - **邮件通知** (`services/email`): 订单与状态变更的 SMTP 通知
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! store-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── checkout/      # 下单业务逻辑
//! ├── services/      # 邮件服务
//! ├── utils/         # 工具函数
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod checkout;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use checkout::CheckoutService;
pub use core::{Config, Server, ServerState};
pub use services::EmailService;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
 _    ___ __       _
| |  / (_) /______(_)___  ____ _
| | / / / __/ ___/ / __ \/ __ `/
| |/ / / /_/ /  / / / / / /_/ /
|___/_/\__/_/  /_/_/ /_/\__,_/
    "#
    );
}
