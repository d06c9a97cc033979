pub mod affinity;
pub mod pod;
pub mod toleration;
