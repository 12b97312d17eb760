//! Writing rendered user data to its destination

use crate::UserDataError;
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::info;

/// Write user data to `path`, or to stdout when no path is given
pub async fn write_user_data(data: &[u8], path: Option<&Path>) -> Result<(), UserDataError> {
    match path {
        Some(path) => {
            tokio::fs::write(path, data).await?;
            info!("Wrote {} bytes of user data to {}", data.len(), path.display());
        }
        None => write_to(&mut tokio::io::stdout(), data).await?,
    }
    Ok(())
}

/// Write user data to an async writer and flush it
pub async fn write_to<W>(writer: &mut W, data: &[u8]) -> Result<(), UserDataError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}
