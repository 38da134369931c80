// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 协议层的数据传输对象，以及在各处理器之间共享的应用状态
pub mod dto;
pub mod state;
