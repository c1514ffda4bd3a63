use std::io;

/// Administrative operations against the OS service manager for one configured service.
pub trait Manager {
    fn install(&self) -> io::Result<()>;
    fn uninstall(&self) -> io::Result<()>;
    fn start(&self) -> io::Result<()>;
    fn stop(&self) -> io::Result<()>;
}

impl<M: Manager + ?Sized> Manager for Box<M> {
    fn install(&self) -> io::Result<()> {
        (**self).install()
    }

    fn uninstall(&self) -> io::Result<()> {
        (**self).uninstall()
    }

    fn start(&self) -> io::Result<()> {
        (**self).start()
    }

    fn stop(&self) -> io::Result<()> {
        (**self).stop()
    }
}
