mod client;
mod error;
mod models;
pub(crate) mod query;

pub use self::{
    client::{ACCESS_TOKEN_HEADER, GraphqlTransport, StorefrontClient},
    error::GraphqlError,
    models::{
        ArticleNode, ArticlesData, BlogData, BlogNode, BlogsData, Connection, Edge,
        GraphqlErrorMessage, GraphqlResponse, UpstreamPageInfo,
    },
};
