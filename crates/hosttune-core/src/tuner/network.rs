//! Network stack tuning targets.

use super::TuningTarget;

pub const SYN_BACKLOG_FILE: &str = "/proc/sys/net/ipv4/tcp_max_syn_backlog";
pub const LISTEN_BACKLOG_FILE: &str = "/proc/sys/net/core/somaxconn";
pub const RFS_TABLE_SIZE_FILE: &str = "/proc/sys/net/core/rps_sock_flow_entries";

/// Half-open connection queue (`net.ipv4.tcp_max_syn_backlog`).
pub const SYN_BACKLOG: TuningTarget = TuningTarget {
    id: "syn_backlog",
    path: SYN_BACKLOG_FILE,
    reference: 4096,
    desc: "Max SYN backlog size",
};

/// Accept queue limit (`net.core.somaxconn`).
pub const LISTEN_BACKLOG: TuningTarget = TuningTarget {
    id: "listen_backlog",
    path: LISTEN_BACKLOG_FILE,
    reference: 4096,
    desc: "Connections listen backlog size",
};

/// Global receive flow steering table (`net.core.rps_sock_flow_entries`).
pub const RFS_TABLE_SIZE: TuningTarget = TuningTarget {
    id: "rfs_table_size",
    path: RFS_TABLE_SIZE_FILE,
    reference: 32768,
    desc: "RFS socket flow table size",
};
