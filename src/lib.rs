#![deny(unreachable_pub)]

pub mod cluster;
pub mod config;
pub mod error;
pub mod hypervisor;
pub mod inventory;
pub mod model;
pub mod playbook;
pub mod poll;
pub mod proxmox;
pub mod remote;
