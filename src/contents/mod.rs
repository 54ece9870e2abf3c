pub mod descriptor;
pub mod heuristics;
pub mod host;
pub mod local;
pub mod locator;
pub mod manager;
pub mod mime;
pub mod model;
pub mod summary;

pub use descriptor::{Descriptor, DescriptorBuilder, DescriptorRegistry};
pub use heuristics::{ExtensionHeuristic, Heuristic, HeuristicSet, SizeHeuristic};
pub use host::{BaseModel, ContentsHost, FileContent};
pub use local::LocalFileHost;
pub use locator::LocatorBuilder;
pub use manager::{ManagerOptions, RemoteContentsManager};
pub use model::{
    ContentFormat, ContentsModel, DescriptorPayload, DirectoryModel, EntryKind, FileModel,
    Locator, ModelBody, ModelDraft, DATASET_MIMETYPE,
};
