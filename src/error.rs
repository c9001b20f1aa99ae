/// 识别流程中可以被调用方区分处理的错误
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 属性数据格式错误，原因会直接返回给用户
    #[error("{0}")]
    InvalidAttributes(String),
    /// 查询向量为空或无法使用
    #[error("query vector is empty or not finite")]
    NoUsableQuery,
    /// 数据库中没有任何可比较的动物
    #[error("No animals in database to compare")]
    EmptyCatalog,
    /// 添加动物时没有提供名称
    #[error("Name is required")]
    MissingName,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
