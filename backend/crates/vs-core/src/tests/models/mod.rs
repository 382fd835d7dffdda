mod binary_encoding;
mod context_level;
mod moment;
mod sharing_policy;
