mod block;
mod dropped;
mod node;
mod record;
mod rich_text;
mod summary;

pub use self::{
    block::map_node,
    dropped::{Dropped, Mapped},
    node::{ContentNode, NodeKind},
    record::{map_record, property},
    rich_text::{RichText, plain_text},
    summary::{ContentDocument, ContentSummary},
};
