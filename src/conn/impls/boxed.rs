use alloc::boxed::Box;

use crate::conn::Connection;

impl<E> Connection for Box<dyn Connection<Error = E>> {
    type Error = E;

    fn write_all(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
        (**self).write_all(buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }

    fn read_up_to(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read_up_to(buf)
    }

    fn on_session_start(&mut self) -> Result<(), Self::Error> {
        (**self).on_session_start()
    }
}
