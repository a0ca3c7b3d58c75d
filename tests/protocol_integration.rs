// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cross-crate test: the tool servers driven end to end over in-memory
//! pipes, the way their binaries drive them over stdio.

use mlp_memory::{MemoryBank, MemoryTools};
use mlp_protocol::{Frame, JsonlCodec, serve};
use mlp_thinking::ThinkingServer;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Run a script of request lines against a handler over a duplex pipe and
/// collect the reply frames.
async fn drive<H>(mut handler: H, script: &str) -> Vec<Frame>
where
    H: mlp_protocol::ToolHandler + Send + 'static,
{
    let (client, server) = tokio::io::duplex(64 * 1024);
    let (server_read, server_write) = tokio::io::split(server);
    let task = tokio::spawn(async move {
        let _ = serve(&mut handler, BufReader::new(server_read), server_write).await;
    });

    let (client_read, mut client_write) = tokio::io::split(client);
    client_write.write_all(script.as_bytes()).await.unwrap();
    client_write.shutdown().await.unwrap();

    let mut replies = Vec::new();
    let mut lines = BufReader::new(client_read).lines();
    while let Some(line) = lines.next_line().await.unwrap() {
        replies.push(JsonlCodec::decode(&line).unwrap());
    }
    task.await.unwrap();
    replies
}

#[tokio::test]
async fn memory_bank_full_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bank.json");
    let tools = MemoryTools::new(MemoryBank::open(&path, 100).unwrap());

    let script = concat!(
        "{\"t\":\"list_tools\",\"id\":\"1\"}\n",
        "{\"t\":\"call\",\"id\":\"2\",\"tool\":\"store_memory\",\"arguments\":{\"content\":\"deploys run at noon\",\"tags\":[\"ops\"],\"importance\":8}}\n",
        "{\"t\":\"call\",\"id\":\"3\",\"tool\":\"retrieve_memories\",\"arguments\":{\"query\":\"deploys\"}}\n",
        "{\"t\":\"call\",\"id\":\"4\",\"tool\":\"get_memory_stats\"}\n",
        "{\"t\":\"call\",\"id\":\"5\",\"tool\":\"no_such_tool\"}\n",
    );
    let replies = drive(tools, script).await;
    assert_eq!(replies.len(), 5);

    match &replies[0] {
        Frame::Tools { ref_id, tools } => {
            assert_eq!(ref_id, "1");
            assert_eq!(tools.len(), 7);
        }
        other => panic!("expected Tools, got {other:?}"),
    }
    match &replies[1] {
        Frame::Result {
            is_error, content, ..
        } => {
            assert!(!is_error);
            assert!(content.contains("Memory stored successfully"));
        }
        other => panic!("expected Result, got {other:?}"),
    }
    match &replies[2] {
        Frame::Result { content, .. } => {
            assert!(content.contains("deploys run at noon"));
        }
        other => panic!("expected Result, got {other:?}"),
    }
    match &replies[3] {
        Frame::Result { metadata, .. } => {
            assert_eq!(metadata["total_memories"], 1);
        }
        other => panic!("expected Result, got {other:?}"),
    }
    // Unknown tool is an error result, not a fatal frame.
    match &replies[4] {
        Frame::Result { is_error, .. } => assert!(is_error),
        other => panic!("expected Result, got {other:?}"),
    }

    // The mutations reached disk.
    let reopened = MemoryBank::open(&path, 100).unwrap();
    assert_eq!(reopened.len(), 1);
}

#[tokio::test]
async fn thinking_session_with_a_branch() {
    let script = concat!(
        "{\"t\":\"call\",\"id\":\"1\",\"tool\":\"sequentialthinking\",\"arguments\":{\"thought\":\"frame the problem\",\"nextThoughtNeeded\":true,\"thoughtNumber\":1,\"totalThoughts\":2}}\n",
        "{\"t\":\"call\",\"id\":\"2\",\"tool\":\"sequentialthinking\",\"arguments\":{\"thought\":\"try the inverse\",\"nextThoughtNeeded\":false,\"thoughtNumber\":2,\"totalThoughts\":2,\"branchFromThought\":1,\"branchId\":\"inverse\"}}\n",
        "{\"t\":\"call\",\"id\":\"3\",\"tool\":\"sequentialthinking\",\"arguments\":{\"thought\":\"\",\"nextThoughtNeeded\":false,\"thoughtNumber\":3,\"totalThoughts\":3}}\n",
    );
    let replies = drive(ThinkingServer::new(false), script).await;
    assert_eq!(replies.len(), 3);

    match &replies[0] {
        Frame::Result { content, .. } => {
            assert_eq!(content, "Thought 1/2: frame the problem");
        }
        other => panic!("expected Result, got {other:?}"),
    }
    match &replies[1] {
        Frame::Result { metadata, .. } => {
            assert_eq!(metadata["branchId"], "inverse");
            assert_eq!(metadata["thoughtHistoryLength"], 2);
        }
        other => panic!("expected Result, got {other:?}"),
    }
    match &replies[2] {
        Frame::Result {
            is_error, content, ..
        } => {
            assert!(is_error);
            assert!(content.contains("non-empty"));
        }
        other => panic!("expected Result, got {other:?}"),
    }
}
